use crate::math::Vec2;

pub const FLOOR_TILE_ID: u16 = 0;
pub const WALL_TILE_ID: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: u16,
    pub passable: bool,
}

impl Tile {
    pub const FLOOR: Self = Self {
        id: FLOOR_TILE_ID,
        passable: true,
    };
    pub const WALL: Self = Self {
        id: WALL_TILE_ID,
        passable: false,
    };
}

/// Grid convention:
/// - tiles are stored row-major, `y` grows downward.
/// - tile `(x, y)` covers the positions whose floor is `(x, y)`.
///
/// The grid is never mutated after [`TileGrid::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    wall_row: Option<u32>,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Walls the border and, if given, one full row. Everything else is floor.
    ///
    /// Panics on a zero dimension.
    pub fn build(width: u32, height: u32, wall_row: Option<u32>) -> Self {
        assert!(
            width > 0 && height > 0,
            "tile grid dimensions must be non-zero, got {width}x{height}"
        );

        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                let on_wall_row = wall_row == Some(y);
                tiles.push(if on_border || on_wall_row {
                    Tile::WALL
                } else {
                    Tile::FLOOR
                });
            }
        }

        Self {
            width,
            height,
            wall_row,
            tiles,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn wall_row(&self) -> Option<u32> {
        self.wall_row
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Panics when `(x, y)` is outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Tile {
        match self.index_of(x, y) {
            Some(index) => self.tiles[index],
            None => panic!(
                "tile ({x}, {y}) is outside the {}x{} grid",
                self.width, self.height
            ),
        }
    }

    /// Panics when `(x, y)` is outside the grid.
    pub fn is_passable(&self, x: u32, y: u32) -> bool {
        self.get(x, y).passable
    }

    pub fn tile_at_world(&self, position: Vec2) -> Option<Tile> {
        let (x, y) = position.tile_coords()?;
        self.index_of(x, y).map(|index| self.tiles[index])
    }

    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, Tile)> + '_ {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, tile)| ((index % width) as u32, (index / width) as u32, *tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_by_five_corners_and_edges_are_walls() {
        let grid = TileGrid::build(5, 5, None);
        assert!(!grid.is_passable(0, 0));
        assert!(!grid.is_passable(4, 4));
        assert!(!grid.is_passable(0, 2));
        assert!(grid.is_passable(2, 2));
        assert_eq!(grid.get(0, 0).id, WALL_TILE_ID);
        assert_eq!(grid.get(2, 2).id, FLOOR_TILE_ID);
    }

    #[test]
    fn border_cells_are_impassable_for_many_sizes() {
        for (width, height) in [(1, 1), (2, 3), (3, 3), (7, 4), (16, 12)] {
            for wall_row in [None, Some(1)] {
                let grid = TileGrid::build(width, height, wall_row);
                for (x, y, tile) in grid.cells() {
                    let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    if on_border || wall_row == Some(y) {
                        assert!(!tile.passable, "({x}, {y}) in {width}x{height}");
                    } else {
                        assert!(tile.passable, "({x}, {y}) in {width}x{height}");
                    }
                }
            }
        }
    }

    #[test]
    fn wall_row_blocks_the_whole_interior_row() {
        let grid = TileGrid::build(8, 6, Some(2));
        for x in 0..8 {
            assert!(!grid.is_passable(x, 2), "x={x}");
        }
        assert!(grid.is_passable(3, 1));
        assert!(grid.is_passable(3, 3));
        assert_eq!(grid.wall_row(), Some(2));
    }

    #[test]
    fn cells_enumerate_row_major() {
        let grid = TileGrid::build(3, 2, None);
        let coords: Vec<(u32, u32)> = grid.cells().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn tile_at_world_floors_and_bounds_checks() {
        let grid = TileGrid::build(5, 5, None);
        assert_eq!(grid.tile_at_world(Vec2::new(2.7, 2.2)), Some(Tile::FLOOR));
        assert_eq!(grid.tile_at_world(Vec2::new(4.5, 2.0)), Some(Tile::WALL));
        assert_eq!(grid.tile_at_world(Vec2::new(5.0, 2.0)), None);
        assert_eq!(grid.tile_at_world(Vec2::new(-1.0, 2.0)), None);
    }

    #[test]
    #[should_panic(expected = "outside the 5x5 grid")]
    fn out_of_range_get_panics() {
        let grid = TileGrid::build(5, 5, None);
        let _ = grid.get(5, 0);
    }

    #[test]
    #[should_panic(expected = "must be non-zero")]
    fn zero_sized_grid_panics() {
        let _ = TileGrid::build(0, 4, None);
    }
}
