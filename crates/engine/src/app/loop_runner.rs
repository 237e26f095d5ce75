use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use crate::input::InputQueue;
use crate::world::World;
use crate::{resolve_app_paths, StartupError};

use super::input::{binding_for_key, HeldActions, KeyBinding};
use super::Renderer;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub tile_px: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Rogue".to_string(),
            window_width: 640,
            window_height: 480,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            tile_px: 32,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs `world` until the window closes or Escape is pressed.
pub fn run_app(config: LoopConfig, mut world: World<'_>) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        sprites_dir = %app_paths.sprites_dir.display(),
        "startup"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(
        Arc::clone(&window),
        app_paths.sprites_dir.clone(),
        config.tile_px,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let mut input_collector = InputCollector::default();

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        tile_px = config.tile_px,
        "loop_config"
    );
    info!(
        actor_count = world.registry().len(),
        grid_width = world.grid().width(),
        grid_height = world.grid().height(),
        "world_loaded"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_applied_title: Option<String> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                    accumulator = accumulator.saturating_add(clamped_frame_dt);

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    for _ in 0..step_plan.ticks_to_run {
                        world.step(&mut input_collector.queue, fixed_dt_seconds);
                    }
                    accumulator = step_plan.remaining_accumulator;

                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    if let Err(error) = renderer.render_world(&world) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }

                    let next_title =
                        window_title_for(&config.window_title, world.messages().latest());
                    if last_applied_title.as_deref() != Some(next_title.as_str()) {
                        window.set_title(&next_title);
                        last_applied_title = Some(next_title);
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!(actor_count = world.registry().len(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Turns key events into queued press edges. Repeats and held keys never
/// queue twice.
#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    held: HeldActions,
    queue: InputQueue,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        if key_event.repeat {
            return;
        }
        self.handle_key_state(key_event.physical_key, key_event.state);
    }

    fn handle_key_state(&mut self, key: PhysicalKey, state: ElementState) {
        match (binding_for_key(key), state) {
            (Some(KeyBinding::Quit), ElementState::Pressed) => self.quit_requested = true,
            (Some(KeyBinding::Action(action)), ElementState::Pressed) => {
                if self.held.press(action) {
                    self.queue.push(action);
                }
            }
            (Some(KeyBinding::Action(action)), ElementState::Released) => {
                self.held.release(action);
            }
            _ => {}
        }
    }
}

fn window_title_for(base: &str, latest_message: Option<&str>) -> String {
    match latest_message {
        Some(message) => format!("{base} - {message}"),
        None => base.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputAction;
    use winit::keyboard::KeyCode;

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn default_config_matches_the_rogue_window() {
        let config = LoopConfig::default();
        assert_eq!(config.window_title, "Rogue");
        assert_eq!((config.window_width, config.window_height), (640, 480));
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);
        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(48), fixed_dt, 5);
        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(120), fixed_dt, 3);
        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn zero_duration_falls_back() {
        let fallback = Duration::from_millis(250);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(5), fallback),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn presses_queue_in_arrival_order() {
        let mut input = InputCollector::default();
        input.handle_key_state(key(KeyCode::KeyA), ElementState::Pressed);
        input.handle_key_state(key(KeyCode::KeyE), ElementState::Pressed);
        input.handle_key_state(key(KeyCode::Tab), ElementState::Pressed);

        assert_eq!(input.queue.pop(), Some(InputAction::MoveLeft));
        assert_eq!(input.queue.pop(), Some(InputAction::Interact));
        assert_eq!(input.queue.pop(), Some(InputAction::Inventory));
        assert!(input.queue.is_empty());
    }

    #[test]
    fn held_key_does_not_queue_again_until_released() {
        let mut input = InputCollector::default();
        input.handle_key_state(key(KeyCode::ArrowRight), ElementState::Pressed);
        input.handle_key_state(key(KeyCode::ArrowRight), ElementState::Pressed);
        assert_eq!(input.queue.len(), 1);

        input.handle_key_state(key(KeyCode::ArrowRight), ElementState::Released);
        input.handle_key_state(key(KeyCode::ArrowRight), ElementState::Pressed);
        assert_eq!(input.queue.len(), 2);
    }

    #[test]
    fn escape_requests_quit_without_queueing() {
        let mut input = InputCollector::default();
        input.handle_key_state(key(KeyCode::Escape), ElementState::Pressed);
        assert!(input.quit_requested);
        assert!(input.queue.is_empty());
    }

    #[test]
    fn title_mirrors_latest_message() {
        assert_eq!(window_title_for("Rogue", None), "Rogue");
        assert_eq!(
            window_title_for("Rogue", Some("You picked up sword.")),
            "Rogue - You picked up sword."
        );
    }
}
