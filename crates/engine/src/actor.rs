use crate::events::{EventChannel, EventQueue};
use crate::inventory::{Inventory, Item, DEFAULT_ITEM_SPRITE_KEY};
use crate::message_log::LogSink;
use crate::math::Vec2;
use crate::registry::ActorHandle;

pub const OBELISK_DIALOGUE: [&str; 2] = [
    "The obelisk hums with a low, ancient power.",
    "Runes crawl across its surface, then fade.",
];
pub const PLAYER_GREETING: &str = "Hello there, traveller!";
pub const CHEST_EMPTY_MESSAGE: &str = "The chest is empty.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Grid `y` grows downward, so North is negative `y`.
    pub fn unit_vector(self) -> Vec2 {
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::West => Vec2::new(-1.0, 0.0),
        }
    }

    pub fn frame_index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Facing from `from` toward `to`. The x axis wins over y; `None` when the
    /// positions are equal.
    pub fn toward(from: Vec2, to: Vec2) -> Option<Self> {
        if to.x < from.x {
            Some(Self::West)
        } else if to.x > from.x {
            Some(Self::East)
        } else if to.y < from.y {
            Some(Self::North)
        } else if to.y > from.y {
            Some(Self::South)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Obelisk,
    Chest,
    Player,
    DroppedItem,
}

impl ActorKind {
    pub fn is_passable(self) -> bool {
        matches!(self, Self::DroppedItem)
    }

    pub fn is_oriented(self) -> bool {
        matches!(self, Self::Chest | Self::Player)
    }

    pub fn debug_name(self) -> &'static str {
        match self {
            Self::Obelisk => "obelisk",
            Self::Chest => "chest",
            Self::Player => "player",
            Self::DroppedItem => "dropped_item",
        }
    }

    fn sprite_key(self) -> &'static str {
        match self {
            Self::Obelisk => "actors/obelisk",
            Self::Chest => "actors/chest",
            Self::Player => "actors/player",
            Self::DroppedItem => DEFAULT_ITEM_SPRITE_KEY,
        }
    }
}

/// What the render layer needs to draw one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor<'a> {
    pub handle: ActorHandle,
    pub kind: ActorKind,
    pub position: Vec2,
    pub sprite_key: &'a str,
    pub frame: u8,
    pub orientation: Option<Orientation>,
}

#[derive(Debug)]
pub struct Actor {
    kind: ActorKind,
    pub position: Vec2,
    orientation: Option<Orientation>,
    inventory: Inventory,
    channel: EventChannel,
}

impl Actor {
    fn new(kind: ActorKind, position: Vec2, orientation: Option<Orientation>) -> Self {
        Self {
            kind,
            position,
            orientation: orientation.filter(|_| kind.is_oriented()),
            inventory: Inventory::new(),
            channel: EventChannel::default(),
        }
    }

    pub fn obelisk(position: Vec2) -> Self {
        Self::new(ActorKind::Obelisk, position, None)
    }

    pub fn chest(position: Vec2, facing: Orientation, contents: Inventory) -> Self {
        let mut chest = Self::new(ActorKind::Chest, position, Some(facing));
        chest.inventory = contents;
        chest
    }

    pub fn player(position: Vec2, facing: Orientation) -> Self {
        Self::new(ActorKind::Player, position, Some(facing))
    }

    pub fn dropped_item(position: Vec2, item: Item) -> Self {
        let mut dropped = Self::new(ActorKind::DroppedItem, position, None);
        dropped.inventory.push(item);
        dropped
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn passable(&self) -> bool {
        self.kind.is_passable()
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Returns `false` for kinds without an orientation.
    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if !self.kind.is_oriented() {
            return false;
        }
        self.orientation = Some(orientation);
        true
    }

    pub fn turn_to(&mut self, target: Vec2) {
        if let Some(facing) = Orientation::toward(self.position, target) {
            self.set_orientation(facing);
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    pub(crate) fn channel_mut(&mut self) -> &mut EventChannel {
        &mut self.channel
    }

    /// Runs this actor's reaction to being used by `other`.
    pub fn interact(&mut self, other: &mut Actor, events: &mut EventQueue, log: &mut dyn LogSink) {
        match self.kind {
            ActorKind::Obelisk => {
                for line in OBELISK_DIALOGUE {
                    log.log(line.to_string());
                }
            }
            ActorKind::Chest => {
                if self.inventory.is_empty() {
                    log.log(CHEST_EMPTY_MESSAGE.to_string());
                    return;
                }
                for item in self.inventory.iter() {
                    log.log(format!("You found {item}."));
                }
                self.inventory.transfer_all_to(&mut other.inventory);
            }
            ActorKind::Player => {
                self.turn_to(other.position);
                log.log(PLAYER_GREETING.to_string());
            }
            ActorKind::DroppedItem => {
                if let Some(item) = self.inventory.take_first() {
                    log.log(format!("You picked up {item}."));
                    other.inventory.push(item);
                }
                self.channel.publish_implode(events);
            }
        }
    }

    pub fn render_descriptor(&self, handle: ActorHandle) -> RenderDescriptor<'_> {
        let sprite_key = match self.kind {
            ActorKind::DroppedItem => self
                .inventory
                .iter()
                .next()
                .map(Item::sprite_key)
                .unwrap_or(DEFAULT_ITEM_SPRITE_KEY),
            kind => kind.sprite_key(),
        };
        RenderDescriptor {
            handle,
            kind: self.kind,
            position: self.position,
            sprite_key,
            frame: self.orientation.map(Orientation::frame_index).unwrap_or(0),
            orientation: self.orientation,
        }
    }
}
