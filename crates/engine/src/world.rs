use tracing::debug;

use crate::actor::RenderDescriptor;
use crate::camera::Camera2D;
use crate::controller::InputController;
use crate::grid::TileGrid;
use crate::input::InputQueue;
use crate::message_log::MessageLog;
use crate::registry::{ActorHandle, ActorRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub inputs_processed: usize,
    pub actors_removed: usize,
}

/// Everything one frame touches, stepped in a fixed order: input, then the
/// removal sweep, then the camera.
#[derive(Debug)]
pub struct World<'g> {
    registry: ActorRegistry<'g>,
    controller: InputController,
    camera: Camera2D,
    messages: MessageLog,
}

impl<'g> World<'g> {
    pub fn new(registry: ActorRegistry<'g>, controlled: ActorHandle, messages: MessageLog) -> Self {
        let camera = Camera2D::new(controlled, &registry);
        Self {
            registry,
            controller: InputController::new(controlled),
            camera,
            messages,
        }
    }

    pub fn step(&mut self, input: &mut InputQueue, dt: f32) -> FrameReport {
        let inputs_processed = self
            .controller
            .drain(input, &mut self.registry, &mut self.messages);
        let actors_removed = self.registry.sweep();
        self.camera.update(dt, &self.registry);

        if inputs_processed > 0 || actors_removed > 0 {
            debug!(inputs_processed, actors_removed, "frame_stepped");
        }
        FrameReport {
            inputs_processed,
            actors_removed,
        }
    }

    pub fn render_list(&self) -> Vec<RenderDescriptor<'_>> {
        self.registry.render_all()
    }

    pub fn grid(&self) -> &'g TileGrid {
        self.registry.grid()
    }

    pub fn registry(&self) -> &ActorRegistry<'g> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ActorRegistry<'g> {
        &mut self.registry
    }

    pub fn controller(&self) -> &InputController {
        &self.controller
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }
}
