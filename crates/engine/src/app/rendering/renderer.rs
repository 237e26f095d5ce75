use std::path::PathBuf;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::actor::{ActorKind, Orientation, RenderDescriptor};
use crate::app::sprites::{FrameRect, LoadedSprite, SpriteCache};
use crate::grid::{Tile, FLOOR_TILE_ID, WALL_TILE_ID};
use crate::math::Vec2;
use crate::world::World;

use super::{world_to_screen, Viewport, PLACEHOLDER_HALF_SIZE_PX};

const CLEAR_COLOR: [u8; 4] = [12, 12, 16, 255];
const TILE_FALLBACK_FLOOR_COLOR: [u8; 4] = [58, 52, 46, 255];
const TILE_FALLBACK_WALL_COLOR: [u8; 4] = [96, 98, 110, 255];
const TILE_FALLBACK_UNKNOWN_COLOR: [u8; 4] = [68, 74, 62, 255];
const OBELISK_COLOR: [u8; 4] = [150, 120, 220, 255];
const CHEST_COLOR: [u8; 4] = [190, 140, 60, 255];
const PLAYER_COLOR: [u8; 4] = [80, 200, 120, 255];
const DROPPED_ITEM_COLOR: [u8; 4] = [230, 220, 90, 255];
const FACING_MARKER_COLOR: [u8; 4] = [250, 250, 250, 255];
const FACING_MARKER_HALF_SIZE_PX: i32 = 1;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    pixels_per_tile: f32,
    sprites: SpriteCache,
}

impl Renderer {
    pub fn new(window: Arc<Window>, sprites_dir: PathBuf, tile_px: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            pixels_per_tile: tile_px.max(1) as f32,
            sprites: SpriteCache::new(sprites_dir),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Tiles first, then actors in the registry's painter's order.
    pub fn render_world(&mut self, world: &World<'_>) -> Result<(), Error> {
        let viewport = self.viewport;
        let pixels_per_tile = self.pixels_per_tile;
        let camera = world.camera().view_translation();
        let frame = self.pixels.frame_mut();
        clear(frame, CLEAR_COLOR);

        for (x, y, tile) in world.grid().cells() {
            let center = world_to_screen(
                Vec2::new(x as f32, y as f32),
                camera,
                viewport,
                pixels_per_tile,
            );
            if !square_on_screen(center, pixels_per_tile, viewport) {
                continue;
            }
            match self.sprites.resolve(tile_sprite_key(tile)) {
                Some(sprite) => draw_sprite_frame_centered(
                    frame,
                    viewport,
                    center,
                    sprite,
                    sprite.frame_rect(0),
                    pixels_per_tile,
                ),
                None => draw_square(
                    frame,
                    viewport,
                    center,
                    tile_half_size_px(pixels_per_tile),
                    tile_fallback_color(tile),
                ),
            }
        }

        for descriptor in world.render_list() {
            let center = world_to_screen(descriptor.position, camera, viewport, pixels_per_tile);
            if !square_on_screen(center, pixels_per_tile, viewport) {
                continue;
            }
            match self.sprites.resolve(descriptor.sprite_key) {
                Some(sprite) => draw_sprite_frame_centered(
                    frame,
                    viewport,
                    center,
                    sprite,
                    sprite.frame_rect(descriptor.frame),
                    pixels_per_tile,
                ),
                None => draw_actor_placeholder(frame, viewport, center, &descriptor),
            }
        }

        self.pixels.render()
    }
}

fn tile_sprite_key(tile: Tile) -> &'static str {
    match tile.id {
        FLOOR_TILE_ID => "tiles/floor",
        WALL_TILE_ID => "tiles/wall",
        _ => "tiles/unknown",
    }
}

fn tile_fallback_color(tile: Tile) -> [u8; 4] {
    match tile.id {
        FLOOR_TILE_ID => TILE_FALLBACK_FLOOR_COLOR,
        WALL_TILE_ID => TILE_FALLBACK_WALL_COLOR,
        _ => TILE_FALLBACK_UNKNOWN_COLOR,
    }
}

fn actor_fallback_color(kind: ActorKind) -> [u8; 4] {
    match kind {
        ActorKind::Obelisk => OBELISK_COLOR,
        ActorKind::Chest => CHEST_COLOR,
        ActorKind::Player => PLAYER_COLOR,
        ActorKind::DroppedItem => DROPPED_ITEM_COLOR,
    }
}

fn tile_half_size_px(pixels_per_tile: f32) -> i32 {
    ((pixels_per_tile / 2.0).round() as i32).max(1)
}

fn square_on_screen(center: (i32, i32), pixels_per_tile: f32, viewport: Viewport) -> bool {
    let half = tile_half_size_px(pixels_per_tile);
    let (cx, cy) = center;
    cx + half >= 0
        && cy + half >= 0
        && cx - half < viewport.width as i32
        && cy - half < viewport.height as i32
}

fn draw_actor_placeholder(
    frame: &mut [u8],
    viewport: Viewport,
    center: (i32, i32),
    descriptor: &RenderDescriptor<'_>,
) {
    draw_square(
        frame,
        viewport,
        center,
        PLACEHOLDER_HALF_SIZE_PX,
        actor_fallback_color(descriptor.kind),
    );
    if let Some(orientation) = descriptor.orientation {
        let marker = facing_marker_center(center, orientation);
        draw_square(
            frame,
            viewport,
            marker,
            FACING_MARKER_HALF_SIZE_PX,
            FACING_MARKER_COLOR,
        );
    }
}

fn facing_marker_center(center: (i32, i32), orientation: Orientation) -> (i32, i32) {
    let unit = orientation.unit_vector();
    let reach = (PLACEHOLDER_HALF_SIZE_PX - FACING_MARKER_HALF_SIZE_PX) as f32;
    (
        center.0 + (unit.x * reach) as i32,
        center.1 + (unit.y * reach) as i32,
    )
}

fn clear(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}

fn draw_square(
    frame: &mut [u8],
    viewport: Viewport,
    center: (i32, i32),
    half_size: i32,
    color: [u8; 4],
) {
    let (cx, cy) = center;
    let top = (cy - half_size).max(0);
    let bottom = (cy + half_size).min(viewport.height as i32 - 1);
    let left = (cx - half_size).max(0);
    let right = (cx + half_size).min(viewport.width as i32 - 1);
    for y in top..=bottom {
        for x in left..=right {
            write_pixel_rgba_clipped(frame, viewport.width as usize, x, y, color);
        }
    }
}

/// Nearest-neighbour blit of one frame, scaled so its height fills one tile.
/// Fully transparent source pixels are skipped.
fn draw_sprite_frame_centered(
    frame: &mut [u8],
    viewport: Viewport,
    center: (i32, i32),
    sprite: &LoadedSprite,
    source: FrameRect,
    pixels_per_tile: f32,
) {
    if source.width == 0 || source.height == 0 || viewport.width == 0 || viewport.height == 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len
        || source.x + source.width > sprite.width
        || source.y + source.height > sprite.height
    {
        return;
    }

    let scale = pixels_per_tile / source.height as f32;
    if !scale.is_finite() || scale <= 0.0 {
        return;
    }
    let inv_scale = scale.recip();
    let scaled_w = (source.width as f32 * scale).round().max(1.0) as i32;
    let scaled_h = (source.height as f32 * scale).round().max(1.0) as i32;
    let left = center.0 - scaled_w / 2;
    let top = center.1 - scaled_h / 2;

    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = (left + scaled_w).min(viewport.width as i32);
    let draw_bottom = (top + scaled_h).min(viewport.height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let frame_width = viewport.width as usize;
    let sprite_width = sprite.width as usize;
    for out_y in draw_top..draw_bottom {
        let src_y = ((out_y - top) as f32 * inv_scale).floor() as u32;
        let src_y = (source.y + src_y.min(source.height - 1)) as usize;
        for out_x in draw_left..draw_right {
            let src_x = ((out_x - left) as f32 * inv_scale).floor() as u32;
            let src_x = (source.x + src_x.min(source.width - 1)) as usize;
            let src_offset = (src_y * sprite_width + src_x) * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = (out_y as usize * frame_width + out_x as usize) * 4;
            if dst_offset + 4 > frame.len() {
                return;
            }
            frame[dst_offset..dst_offset + 4]
                .copy_from_slice(&sprite.rgba[src_offset..src_offset + 4]);
        }
    }
}
