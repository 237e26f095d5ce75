use std::collections::VecDeque;

use crate::actor::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    Inventory,
}

impl InputAction {
    pub const ALL: [Self; 6] = [
        Self::MoveUp,
        Self::MoveDown,
        Self::MoveLeft,
        Self::MoveRight,
        Self::Interact,
        Self::Inventory,
    ];

    /// Facing requested by a movement symbol.
    pub fn direction(self) -> Option<Orientation> {
        match self {
            Self::MoveUp => Some(Orientation::North),
            Self::MoveDown => Some(Orientation::South),
            Self::MoveLeft => Some(Orientation::West),
            Self::MoveRight => Some(Orientation::East),
            Self::Interact | Self::Inventory => None,
        }
    }
}

/// Pending key presses, consumed from the front.
#[derive(Debug, Default, Clone)]
pub struct InputQueue {
    actions: VecDeque<InputAction>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: InputAction) {
        self.actions.push_back(action);
    }

    pub fn pop(&mut self) -> Option<InputAction> {
        self.actions.pop_front()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl FromIterator<InputAction> for InputQueue {
    fn from_iter<I: IntoIterator<Item = InputAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}
