use tracing::debug;

use crate::input::{InputAction, InputQueue};
use crate::message_log::LogSink;
use crate::registry::{ActorHandle, ActorRegistry};

/// Applies input symbols to one actor. Holds nothing but the handle; facing,
/// position and inventory all live on the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputController {
    controlled: ActorHandle,
}

impl InputController {
    pub fn new(controlled: ActorHandle) -> Self {
        Self { controlled }
    }

    pub fn controlled(&self) -> ActorHandle {
        self.controlled
    }

    /// Consumes exactly one symbol from the front of `queue`.
    pub fn process_next(
        &self,
        queue: &mut InputQueue,
        registry: &mut ActorRegistry<'_>,
        log: &mut dyn LogSink,
    ) -> Option<InputAction> {
        let action = queue.pop()?;
        match action.direction() {
            Some(_) => self.step(action, registry),
            None if action == InputAction::Interact => self.interact(registry, log),
            None => self.list_inventory(registry, log),
        }
        Some(action)
    }

    /// Processes the whole queue in order. Returns how many symbols were used.
    pub fn drain(
        &self,
        queue: &mut InputQueue,
        registry: &mut ActorRegistry<'_>,
        log: &mut dyn LogSink,
    ) -> usize {
        let mut processed = 0;
        while self.process_next(queue, registry, log).is_some() {
            processed += 1;
        }
        processed
    }

    fn step(&self, action: InputAction, registry: &mut ActorRegistry<'_>) {
        let Some(facing) = action.direction() else {
            return;
        };
        let Some(actor) = registry.get_mut(self.controlled) else {
            debug!(actor = %self.controlled, ?action, "controlled_actor_missing");
            return;
        };
        actor.set_orientation(facing);
        let destination = actor.position + facing.unit_vector();

        if registry.is_passable(destination) {
            if let Some(actor) = registry.get_mut(self.controlled) {
                actor.position = destination;
            }
        } else {
            debug!(
                actor = %self.controlled,
                x = destination.x,
                y = destination.y,
                "move_blocked"
            );
        }
    }

    fn interact(&self, registry: &mut ActorRegistry<'_>, log: &mut dyn LogSink) {
        let Some(actor) = registry.get(self.controlled) else {
            debug!(actor = %self.controlled, "controlled_actor_missing");
            return;
        };
        let Some(facing) = actor.orientation() else {
            return;
        };
        let probe = actor.position + facing.unit_vector();
        if let Some(target) = registry.actor_at(probe) {
            registry.interact(target, self.controlled, log);
        }
    }

    fn list_inventory(&self, registry: &ActorRegistry<'_>, log: &mut dyn LogSink) {
        match registry.get(self.controlled) {
            Some(actor) => log.log(actor.inventory().listing()),
            None => debug!(actor = %self.controlled, "controlled_actor_missing"),
        }
    }
}
