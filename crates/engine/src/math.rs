use std::ops::{Add, AddAssign, Mul, Sub};

/// Position in grid units. Actors normally sit on integral coordinates; the
/// camera interpolates between them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Floors both components to a tile coordinate. Negative or non-finite
    /// positions have no tile.
    pub fn tile_coords(self) -> Option<(u32, u32)> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return None;
        }
        let x = self.x.floor();
        let y = self.y.floor();
        if x < 0.0 || y < 0.0 || x > u32::MAX as f32 || y > u32::MAX as f32 {
            return None;
        }
        Some((x as u32, y as u32))
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}
