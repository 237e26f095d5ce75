use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Grid `y` grows downward, and so does screen `y`. The camera translation
/// lands on the viewport centre.
pub fn world_to_screen(
    world: Vec2,
    camera_translation: Vec2,
    viewport: Viewport,
    pixels_per_tile: f32,
) -> (i32, i32) {
    let x = (world.x - camera_translation.x) * pixels_per_tile + viewport.width as f32 * 0.5;
    let y = (world.y - camera_translation.y) * pixels_per_tile + viewport.height as f32 * 0.5;
    (x.round() as i32, y.round() as i32)
}
