use std::fmt;

pub const DEFAULT_ITEM_SPRITE_KEY: &str = "items/unknown";

/// A named item. Deliberately not `Clone`: an item lives in exactly one
/// inventory and only ever moves.
#[derive(Debug, PartialEq, Eq)]
pub struct Item {
    name: String,
    sprite_key: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_sprite(name, DEFAULT_ITEM_SPRITE_KEY)
    }

    pub fn with_sprite(name: impl Into<String>, sprite_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sprite_key: sprite_key.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite_key(&self) -> &str {
        &self.sprite_key
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Items in acquisition order. Equal names stay separate entries.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Item::name).collect()
    }

    pub fn take_first(&mut self) -> Option<Item> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.remove(0))
    }

    /// Moves every item to the end of `destination`, keeping their order.
    /// Returns how many moved.
    pub fn transfer_all_to(&mut self, destination: &mut Inventory) -> usize {
        let moved = self.items.len();
        destination.items.extend(self.items.drain(..));
        moved
    }

    pub fn listing(&self) -> String {
        if self.items.is_empty() {
            return "Your inventory is empty.".to_string();
        }
        let names = self.names().join(", ");
        format!("Inventory ({}): {names}", self.items.len())
    }
}

impl FromIterator<Item> for Inventory {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
