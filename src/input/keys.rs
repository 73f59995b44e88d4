//! Keyboard mapping
//!
//! Key names follow the browser `KeyboardEvent.key` values.

use crate::sim::Direction;

/// What a key press asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Move(Direction),
    TogglePause,
    Start,
}

/// Map a key name to a command (None for unbound keys)
pub fn map_key(key: &str) -> Option<KeyCommand> {
    let command = match key {
        "ArrowUp" | "w" | "W" => KeyCommand::Move(Direction::Up),
        "ArrowDown" | "s" | "S" => KeyCommand::Move(Direction::Down),
        "ArrowLeft" | "a" | "A" => KeyCommand::Move(Direction::Left),
        "ArrowRight" | "d" | "D" => KeyCommand::Move(Direction::Right),
        " " | "p" | "P" | "Escape" => KeyCommand::TogglePause,
        "Enter" => KeyCommand::Start,
        _ => return None,
    };
    Some(command)
}
