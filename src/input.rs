//! Key bindings (WASD, arrows, vim-style) and the blocking terminal action source.

use crate::flow::{Action, ActionSource};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::trace;

/// Map key event to game action. `None` for keys the game does not use.
pub fn key_to_action(key: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL {
        return matches!(code, KeyCode::Char('c')).then_some(Action::Exit);
    }
    if !modifiers.is_empty() && modifiers != KeyModifiers::SHIFT {
        return None;
    }
    match code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Some(Action::Up),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => Some(Action::Left),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Some(Action::Down),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => Some(Action::Right),
        KeyCode::Char('r' | 'R') => Some(Action::Restart),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Action::Exit),
        _ => None,
    }
}

/// Reads crossterm key presses until one maps to an action.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl ActionSource for TerminalInput {
    fn next_action(&mut self) -> Result<Action> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key_to_action(key) {
                Some(action) => return Ok(action),
                None => trace!("ignoring key {:?}", key.code),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letter_keys() {
        assert_eq!(key_to_action(press(KeyCode::Char('w'))), Some(Action::Up));
        assert_eq!(key_to_action(press(KeyCode::Char('A'))), Some(Action::Left));
        assert_eq!(key_to_action(press(KeyCode::Char('s'))), Some(Action::Down));
        assert_eq!(key_to_action(press(KeyCode::Char('D'))), Some(Action::Right));
        assert_eq!(key_to_action(press(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(key_to_action(press(KeyCode::Char('Q'))), Some(Action::Exit));
    }

    #[test]
    fn test_arrows_and_vim() {
        assert_eq!(key_to_action(press(KeyCode::Up)), Some(Action::Up));
        assert_eq!(key_to_action(press(KeyCode::Right)), Some(Action::Right));
        assert_eq!(key_to_action(press(KeyCode::Char('h'))), Some(Action::Left));
        assert_eq!(key_to_action(press(KeyCode::Char('j'))), Some(Action::Down));
        assert_eq!(key_to_action(press(KeyCode::Esc)), Some(Action::Exit));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(key_to_action(press(KeyCode::Char('x'))), None);
        assert_eq!(key_to_action(press(KeyCode::Enter)), None);
        let alt_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_w), None);
    }

    #[test]
    fn test_ctrl_c_exits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Some(Action::Exit));
        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_w), None);
    }
}
