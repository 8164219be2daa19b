//! Key mapping from terminal events to game commands.

use crate::types::GameCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIntent {
    Command(GameCommand),
    /// `Pause` or `Resume`, depending on the loop state the host sees
    TogglePause,
    Quit,
}

/// Map a key event to an intent. Releases are ignored.
pub fn map_key(key: KeyEvent) -> Option<InputIntent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(InputIntent::Quit);
    }
    let command = match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            GameCommand::MoveLeft
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            GameCommand::MoveRight
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            GameCommand::SoftDrop
        }

        // Rotation is clockwise only.
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => GameCommand::Rotate,

        KeyCode::Char(' ') | KeyCode::Enter => GameCommand::HardDrop,
        KeyCode::Char('r') | KeyCode::Char('R') => GameCommand::Reset,

        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => {
            return Some(InputIntent::TogglePause)
        }

        _ => return None,
    };
    Some(InputIntent::Command(command))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn command(code: KeyCode) -> Option<GameCommand> {
        match map_key(KeyEvent::from(code)) {
            Some(InputIntent::Command(c)) => Some(c),
            _ => None,
        }
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(command(KeyCode::Left), Some(GameCommand::MoveLeft));
        assert_eq!(command(KeyCode::Right), Some(GameCommand::MoveRight));
        assert_eq!(command(KeyCode::Down), Some(GameCommand::SoftDrop));

        assert_eq!(command(KeyCode::Char('H')), Some(GameCommand::MoveLeft));
        assert_eq!(command(KeyCode::Char('L')), Some(GameCommand::MoveRight));
        assert_eq!(command(KeyCode::Char('J')), Some(GameCommand::SoftDrop));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(command(KeyCode::Up), Some(GameCommand::Rotate));
        assert_eq!(command(KeyCode::Char('w')), Some(GameCommand::Rotate));
        assert_eq!(command(KeyCode::Char(' ')), Some(GameCommand::HardDrop));
        assert_eq!(command(KeyCode::Char('r')), Some(GameCommand::Reset));
        assert_eq!(command(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_pause_is_a_toggle() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('p'))),
            Some(InputIntent::TogglePause)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Esc)), Some(InputIntent::TogglePause));
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('Q'))),
            Some(InputIntent::Quit)
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }
}
