//! Keyboard translation to key characters.
//!
//! The viewer binds keys by the character they produce, so the logical key
//! is used rather than the scan code. Escape and Backspace are delivered as
//! their ASCII control characters.

use std::collections::HashSet;

use orrery_scene::ESCAPE;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, NamedKey};

/// Character delivered for the Backspace key.
pub const BACKSPACE: char = '\u{8}';

/// Minimal description of a key event for processing.
#[derive(Debug, Clone)]
pub struct RawKeyEvent {
    pub key: Key,
    pub state: ElementState,
    pub repeat: bool,
}

/// Tracks held keys and turns fresh presses into characters.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`], returning the character of a new press.
    pub fn process_event(&mut self, event: &KeyEvent) -> Option<char> {
        self.process_raw(RawKeyEvent {
            key: event.logical_key.clone(),
            state: event.state,
            repeat: event.repeat,
        })
    }

    /// Processes a [`RawKeyEvent`] (platform-independent, test-friendly).
    ///
    /// Repeats and presses of keys that are already held yield `None`.
    pub fn process_raw(&mut self, event: RawKeyEvent) -> Option<char> {
        match event.state {
            ElementState::Released => {
                self.held.remove(&event.key);
                None
            }
            ElementState::Pressed if event.repeat => None,
            ElementState::Pressed => {
                if !self.held.insert(event.key.clone()) {
                    return None;
                }
                let ch = key_char(&event.key);
                tracing::debug!("Key pressed: {:?} -> {ch:?}", event.key);
                ch
            }
        }
    }

    /// Forget held keys, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

fn key_char(key: &Key) -> Option<char> {
    match key {
        Key::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
        Key::Named(NamedKey::Escape) => Some(ESCAPE),
        Key::Named(NamedKey::Backspace) => Some(BACKSPACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> RawKeyEvent {
        RawKeyEvent {
            key,
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    fn release(key: Key) -> RawKeyEvent {
        RawKeyEvent {
            key,
            state: ElementState::Released,
            repeat: false,
        }
    }

    fn ch(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn test_character_press() {
        let mut kb = KeyboardState::new();
        assert_eq!(kb.process_raw(press(ch("t"))), Some('t'));
        assert_eq!(kb.process_raw(release(ch("t"))), None);
    }

    #[test]
    fn test_shifted_character_kept() {
        let mut kb = KeyboardState::new();
        assert_eq!(kb.process_raw(press(ch("Q"))), Some('Q'));
    }

    #[test]
    fn test_named_keys() {
        let mut kb = KeyboardState::new();
        assert_eq!(kb.process_raw(press(Key::Named(NamedKey::Escape))), Some(ESCAPE));
        assert_eq!(
            kb.process_raw(press(Key::Named(NamedKey::Backspace))),
            Some(BACKSPACE)
        );
        assert_eq!(kb.process_raw(press(Key::Named(NamedKey::F1))), None);
    }

    #[test]
    fn test_repeat_and_held_ignored() {
        let mut kb = KeyboardState::new();
        assert_eq!(kb.process_raw(press(ch("l"))), Some('l'));
        let mut repeat = press(ch("l"));
        repeat.repeat = true;
        assert_eq!(kb.process_raw(repeat), None);
        assert_eq!(kb.process_raw(press(ch("l"))), None);
        kb.process_raw(release(ch("l")));
        assert_eq!(kb.process_raw(press(ch("l"))), Some('l'));
    }

    #[test]
    fn test_clear_forgets_held() {
        let mut kb = KeyboardState::new();
        kb.process_raw(press(ch("o")));
        kb.clear();
        assert_eq!(kb.process_raw(press(ch("o"))), Some('o'));
    }

    #[test]
    fn test_multi_char_input_ignored() {
        let mut kb = KeyboardState::new();
        assert_eq!(kb.process_raw(press(ch("ab"))), None);
    }
}
