//! Actor lifecycle events.
//!
//! Actors never remove themselves. They publish an event through their
//! channel into the registry's queue, and the registry acts on the queue at
//! its sweep point once per frame.

use tracing::debug;

use crate::registry::ActorHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorEvent {
    /// The source actor asks to be removed from the world.
    Implode { source: ActorHandle },
}

impl ActorEvent {
    pub fn source(&self) -> ActorHandle {
        match self {
            Self::Implode { source } => *source,
        }
    }
}

/// Events collected during a frame and drained at the sweep point.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<ActorEvent>,
}

impl EventQueue {
    pub fn send(&mut self, event: ActorEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ActorEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Per-actor publish point. The registry subscribes when it takes ownership
/// of the actor; events published before that have no observer and are
/// dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventChannel {
    subscription: Option<ActorHandle>,
}

impl EventChannel {
    pub(crate) fn subscribe(&mut self, handle: ActorHandle) {
        self.subscription = Some(handle);
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn publish_implode(&self, queue: &mut EventQueue) -> bool {
        let Some(source) = self.subscription else {
            debug!("implode_without_observer");
            return false;
        };
        queue.send(ActorEvent::Implode { source });
        debug!(actor = %source, "actor_implode_queued");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribed_channel_drops_events() {
        let channel = EventChannel::default();
        let mut queue = EventQueue::default();
        assert!(!channel.is_subscribed());
        assert!(!channel.publish_implode(&mut queue));
        assert!(queue.is_empty());
    }

    #[test]
    fn subscribed_channel_tags_events_with_its_handle() {
        let handle = ActorHandle::new(3, 1);
        let mut channel = EventChannel::default();
        channel.subscribe(handle);
        let mut queue = EventQueue::default();

        assert!(channel.publish_implode(&mut queue));
        assert!(channel.publish_implode(&mut queue));

        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|event| event.source() == handle));
        let drained: Vec<ActorEvent> = queue.drain().collect();
        assert_eq!(drained[0], ActorEvent::Implode { source: handle });
        assert!(queue.is_empty());
    }
}
