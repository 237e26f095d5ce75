use crate::math::Vec2;
use crate::registry::{ActorHandle, ActorRegistry};

/// Follows one actor with exponential smoothing. The target is fixed for the
/// camera's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    target: ActorHandle,
}

impl Camera2D {
    /// Starts on the target, or at the origin when the handle is already dead.
    pub fn new(target: ActorHandle, registry: &ActorRegistry<'_>) -> Self {
        let position = registry
            .get(target)
            .map(|actor| actor.position)
            .unwrap_or(Vec2::ZERO);
        Self { position, target }
    }

    pub fn target(&self) -> ActorHandle {
        self.target
    }

    /// Holds still once the target has been removed.
    pub fn update(&mut self, dt: f32, registry: &ActorRegistry<'_>) {
        if let Some(actor) = registry.get(self.target) {
            self.approach(actor.position, dt);
        }
    }

    /// `position += dt * (target - position)`. Not clamped: `dt > 1`
    /// overshoots.
    pub fn approach(&mut self, target: Vec2, dt: f32) {
        self.position += (target - self.position) * dt;
    }

    /// World-space translation the renderer subtracts from every drawable.
    pub fn view_translation(&self) -> Vec2 {
        self.position
    }
}
