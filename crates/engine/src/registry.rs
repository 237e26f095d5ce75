use std::fmt;

use tracing::debug;

use crate::actor::{Actor, RenderDescriptor};
use crate::events::EventQueue;
use crate::grid::TileGrid;
use crate::math::Vec2;
use crate::message_log::LogSink;

/// Generation-checked actor identity. A handle outlives its actor safely:
/// once the slot is reused the generation no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorHandle {
    index: u32,
    generation: u32,
}

impl ActorHandle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    actor: Option<Actor>,
}

/// Owns every live actor placed on one grid.
///
/// Removal is deferred: an actor that implodes stays in its slot until
/// [`ActorRegistry::sweep`], but lookups already treat it as gone.
#[derive(Debug)]
pub struct ActorRegistry<'g> {
    grid: &'g TileGrid,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: Vec<ActorHandle>,
    events: EventQueue,
}

impl<'g> ActorRegistry<'g> {
    pub fn new(grid: &'g TileGrid) -> Self {
        Self {
            grid,
            slots: Vec::new(),
            free: Vec::new(),
            live: Vec::new(),
            events: EventQueue::default(),
        }
    }

    pub fn grid(&self) -> &'g TileGrid {
        self.grid
    }

    pub fn add_actor(&mut self, mut actor: Actor) -> ActorHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let handle = ActorHandle::new(index, slot.generation);
        actor.channel_mut().subscribe(handle);
        debug!(
            actor = %handle,
            kind = actor.kind().debug_name(),
            x = actor.position.x,
            y = actor.position.y,
            "actor_registered"
        );
        slot.actor = Some(actor);
        self.live.push(handle);
        handle
    }

    pub fn get(&self, handle: ActorHandle) -> Option<&Actor> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.actor.as_ref())
    }

    pub fn get_mut(&mut self, handle: ActorHandle) -> Option<&mut Actor> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.actor.as_mut())
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live actors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorHandle, &Actor)> + '_ {
        self.live
            .iter()
            .filter_map(move |handle| self.get(*handle).map(|actor| (*handle, actor)))
    }

    pub fn is_pending_removal(&self, handle: ActorHandle) -> bool {
        self.events.iter().any(|event| event.source() == handle)
    }

    fn is_present(&self, handle: ActorHandle) -> bool {
        self.get(handle).is_some() && !self.is_pending_removal(handle)
    }

    fn present(&self) -> impl Iterator<Item = (ActorHandle, &Actor)> + '_ {
        self.iter()
            .filter(move |(handle, _)| !self.is_pending_removal(*handle))
    }

    /// The tile under the floored position must be passable and no solid
    /// actor may sit exactly at `position`.
    pub fn is_passable(&self, position: Vec2) -> bool {
        let tile_passable = self
            .grid
            .tile_at_world(position)
            .map(|tile| tile.passable)
            .unwrap_or(false);
        tile_passable
            && !self
                .present()
                .any(|(_, actor)| !actor.passable() && actor.position == position)
    }

    /// First actor in registration order standing exactly at `position`.
    pub fn actor_at(&self, position: Vec2) -> Option<ActorHandle> {
        self.present()
            .find(|(_, actor)| actor.position == position)
            .map(|(handle, _)| handle)
    }

    /// Runs `target`'s interaction against `initiator`. Returns `false` when
    /// either actor is gone or about to be swept.
    ///
    /// Panics if `target == initiator`.
    pub fn interact(
        &mut self,
        target: ActorHandle,
        initiator: ActorHandle,
        log: &mut dyn LogSink,
    ) -> bool {
        assert_ne!(target, initiator, "an actor cannot interact with itself");
        if !self.is_present(target) || !self.is_present(initiator) {
            return false;
        }
        let Some((target_actor, initiator_actor)) =
            pair_mut(&mut self.slots, target.index, initiator.index)
        else {
            return false;
        };
        target_actor.interact(initiator_actor, &mut self.events, log);
        true
    }

    /// Drops every actor that imploded since the last sweep. Returns how many
    /// were removed.
    pub fn sweep(&mut self) -> usize {
        if self.events.is_empty() {
            return 0;
        }
        let mut doomed: Vec<ActorHandle> =
            self.events.drain().map(|event| event.source()).collect();
        doomed.sort();
        doomed.dedup();

        let mut removed = 0;
        for handle in &doomed {
            let Some(slot) = self.slots.get_mut(handle.index as usize) else {
                continue;
            };
            if slot.generation != handle.generation || slot.actor.take().is_none() {
                continue;
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(handle.index);
            removed += 1;
        }
        self.live.retain(|handle| doomed.binary_search(handle).is_err());

        debug!(removed, remaining = self.live.len(), "actors_swept");
        removed
    }

    /// Descriptors sorted by ascending `y`. Equal rows keep registration order.
    pub fn render_all(&self) -> Vec<RenderDescriptor<'_>> {
        let mut descriptors: Vec<RenderDescriptor<'_>> = self
            .iter()
            .map(|(handle, actor)| actor.render_descriptor(handle))
            .collect();
        descriptors.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        descriptors
    }
}

fn pair_mut(slots: &mut [Slot], first: u32, second: u32) -> Option<(&mut Actor, &mut Actor)> {
    let (first, second) = (first as usize, second as usize);
    if first == second || first >= slots.len() || second >= slots.len() {
        return None;
    }
    let (a, b) = if first < second {
        let (head, tail) = slots.split_at_mut(second);
        (&mut head[first], &mut tail[0])
    } else {
        let (head, tail) = slots.split_at_mut(first);
        (&mut tail[0], &mut head[second])
    };
    Some((a.actor.as_mut()?, b.actor.as_mut()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorKind, Orientation};
    use crate::inventory::Item;
    use crate::message_log::MessageLog;

    fn open_grid() -> TileGrid {
        TileGrid::build(10, 10, None)
    }

    #[test]
    fn solid_actor_blocks_its_exact_position_only() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        registry.add_actor(Actor::obelisk(Vec2::new(3.0, 3.0)));
        registry.add_actor(Actor::dropped_item(Vec2::new(5.0, 5.0), Item::new("gem")));

        assert!(!registry.is_passable(Vec2::new(3.0, 3.0)));
        assert!(registry.is_passable(Vec2::new(3.0, 4.0)));
        assert!(registry.is_passable(Vec2::new(5.0, 5.0)));
        assert!(!registry.is_passable(Vec2::new(0.0, 3.0)));
        assert!(!registry.is_passable(Vec2::new(-1.0, 3.0)));
    }

    #[test]
    fn actor_at_returns_first_registered_match() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        let first = registry.add_actor(Actor::dropped_item(Vec2::new(4.0, 4.0), Item::new("a")));
        registry.add_actor(Actor::dropped_item(Vec2::new(4.0, 4.0), Item::new("b")));

        assert_eq!(registry.actor_at(Vec2::new(4.0, 4.0)), Some(first));
        assert_eq!(registry.actor_at(Vec2::new(4.0, 5.0)), None);
    }

    #[test]
    fn dropped_item_pickup_removes_it_at_sweep() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        let mut log = MessageLog::default();
        let player = registry.add_actor(Actor::player(Vec2::new(2.0, 3.0), Orientation::North));
        let dropped = registry.add_actor(Actor::dropped_item(
            Vec2::new(2.0, 2.0),
            Item::new("sword"),
        ));
        let obelisk = registry.add_actor(Actor::obelisk(Vec2::new(6.0, 6.0)));

        assert!(registry.interact(dropped, player, &mut log));
        assert!(registry.is_pending_removal(dropped));
        assert_eq!(registry.actor_at(Vec2::new(2.0, 2.0)), None);
        assert_eq!(registry.len(), 3);

        assert_eq!(registry.sweep(), 1);
        assert_eq!(registry.len(), 2);
        assert!(registry.get(dropped).is_none());
        assert_eq!(registry.actor_at(Vec2::new(2.0, 2.0)), None);
        let survivors: Vec<ActorHandle> = registry.iter().map(|(handle, _)| handle).collect();
        assert_eq!(survivors, vec![player, obelisk]);
        let player_actor = registry.get(player).expect("player survives");
        assert_eq!(player_actor.inventory().names(), vec!["sword"]);
    }

    #[test]
    fn interacting_with_a_doomed_actor_is_a_no_op() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        let mut log = MessageLog::default();
        let player = registry.add_actor(Actor::player(Vec2::new(2.0, 3.0), Orientation::North));
        let dropped = registry.add_actor(Actor::dropped_item(
            Vec2::new(2.0, 2.0),
            Item::new("sword"),
        ));

        assert!(registry.interact(dropped, player, &mut log));
        let lines_after_first = log.len();
        assert!(!registry.interact(dropped, player, &mut log));
        assert_eq!(log.len(), lines_after_first);
        assert_eq!(registry.sweep(), 1);
        assert_eq!(registry.sweep(), 0);
    }

    #[test]
    fn stale_handle_does_not_resolve_after_slot_reuse() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        let mut log = MessageLog::default();
        let player = registry.add_actor(Actor::player(Vec2::new(2.0, 3.0), Orientation::North));
        let dropped = registry.add_actor(Actor::dropped_item(
            Vec2::new(2.0, 2.0),
            Item::new("sword"),
        ));
        registry.interact(dropped, player, &mut log);
        registry.sweep();

        let replacement = registry.add_actor(Actor::obelisk(Vec2::new(7.0, 7.0)));
        assert_eq!(replacement.index(), dropped.index());
        assert_ne!(replacement, dropped);
        assert!(registry.get(dropped).is_none());
        assert_eq!(
            registry.get(replacement).map(Actor::kind),
            Some(ActorKind::Obelisk)
        );
        assert!(!registry.interact(dropped, player, &mut log));
    }

    #[test]
    fn render_all_sorts_by_y_and_keeps_ties_stable() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        let low = registry.add_actor(Actor::obelisk(Vec2::new(1.0, 6.0)));
        let tie_a = registry.add_actor(Actor::obelisk(Vec2::new(5.0, 2.0)));
        let tie_b = registry.add_actor(Actor::obelisk(Vec2::new(3.0, 2.0)));
        let high = registry.add_actor(Actor::obelisk(Vec2::new(8.0, 1.0)));

        let order: Vec<ActorHandle> = registry
            .render_all()
            .iter()
            .map(|descriptor| descriptor.handle)
            .collect();
        assert_eq!(order, vec![high, tie_a, tie_b, low]);
    }

    #[test]
    fn registration_subscribes_the_event_channel() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        let handle = registry.add_actor(Actor::obelisk(Vec2::new(1.0, 1.0)));
        let actor = registry.get(handle).expect("registered");
        assert!(actor.channel().is_subscribed());
    }

    #[test]
    #[should_panic(expected = "cannot interact with itself")]
    fn self_interaction_panics() {
        let grid = open_grid();
        let mut registry = ActorRegistry::new(&grid);
        let mut log = MessageLog::default();
        let player = registry.add_actor(Actor::player(Vec2::new(2.0, 3.0), Orientation::North));
        registry.interact(player, player, &mut log);
    }
}
