use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::InputAction;

/// What a physical key means to the frontend. Quit never reaches the
/// simulation's input queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBinding {
    Action(InputAction),
    Quit,
}

pub fn binding_for_key(key: PhysicalKey) -> Option<KeyBinding> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let action = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => InputAction::MoveUp,
        KeyCode::KeyS | KeyCode::ArrowDown => InputAction::MoveDown,
        KeyCode::KeyA | KeyCode::ArrowLeft => InputAction::MoveLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => InputAction::MoveRight,
        KeyCode::KeyE | KeyCode::Space => InputAction::Interact,
        KeyCode::KeyI | KeyCode::Tab => InputAction::Inventory,
        KeyCode::Escape => return Some(KeyBinding::Quit),
        _ => return None,
    };
    Some(KeyBinding::Action(action))
}

/// Which bound actions are currently held, so a press only counts on the
/// up-to-down edge.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HeldActions {
    down: [bool; InputAction::ALL.len()],
}

impl HeldActions {
    /// Returns `true` when this call is the press edge.
    pub(crate) fn press(&mut self, action: InputAction) -> bool {
        let slot = &mut self.down[index(action)];
        let edge = !*slot;
        *slot = true;
        edge
    }

    pub(crate) fn release(&mut self, action: InputAction) {
        self.down[index(action)] = false;
    }
}

const fn index(action: InputAction) -> usize {
    match action {
        InputAction::MoveUp => 0,
        InputAction::MoveDown => 1,
        InputAction::MoveLeft => 2,
        InputAction::MoveRight => 3,
        InputAction::Interact => 4,
        InputAction::Inventory => 5,
    }
}
