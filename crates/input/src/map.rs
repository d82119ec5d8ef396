//! Key mapping from terminal events to input actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GameMode;

/// Cursor movement on the grid. `Up` moves toward the danger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What a key press asks for, before it is tied to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Move(Direction),
    /// Toggle the tile under the cursor
    Toggle,
    Start(GameMode),
    Pause,
    Restart,
    Menu,
}

/// Map keyboard input to input actions.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    match key.code {
        // Cursor
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(InputAction::Move(Direction::Up)),
        KeyCode::Down
        | KeyCode::Char('j')
        | KeyCode::Char('J')
        | KeyCode::Char('s')
        | KeyCode::Char('S') => Some(InputAction::Move(Direction::Down)),
        KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Char('H')
        | KeyCode::Char('a')
        | KeyCode::Char('A') => Some(InputAction::Move(Direction::Left)),
        KeyCode::Right
        | KeyCode::Char('l')
        | KeyCode::Char('L')
        | KeyCode::Char('d')
        | KeyCode::Char('D') => Some(InputAction::Move(Direction::Right)),

        // Selection
        KeyCode::Char(' ') | KeyCode::Enter => Some(InputAction::Toggle),

        // Modes
        KeyCode::Char('1') | KeyCode::Char('c') | KeyCode::Char('C') => {
            Some(InputAction::Start(GameMode::Classic))
        }
        KeyCode::Char('2') | KeyCode::Char('t') | KeyCode::Char('T') => {
            Some(InputAction::Start(GameMode::Time))
        }

        // Session
        KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),
        KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => Some(InputAction::Menu),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
