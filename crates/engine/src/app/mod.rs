mod input;
mod loop_runner;
mod rendering;
mod sprites;

pub use input::{binding_for_key, KeyBinding};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{world_to_screen, Renderer, Viewport, PLACEHOLDER_HALF_SIZE_PX};
pub use sprites::{validate_sprite_key, SpriteKeyError, ORIENTED_FRAME_COUNT};
