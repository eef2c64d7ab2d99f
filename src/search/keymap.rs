// src/search/keymap.rs
//! Semantic key bindings for the search surface.
//!
//! The embedding layer translates its raw key events into
//! [`KeyChord`]s (resolving the platform modifier: Cmd on macOS, Ctrl
//! elsewhere) and asks the map what they mean. Bindings are data, so a
//! deployment can rebind without touching the session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    None,
    /// Cmd on macOS, Ctrl everywhere else.
    Platform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Escape,
    Up,
    Down,
    Enter,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub modifier: Modifier,
    pub key: Key,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            modifier: Modifier::None,
            key,
        }
    }

    pub fn platform(key: Key) -> Self {
        Self {
            modifier: Modifier::Platform,
            key,
        }
    }
}

/// What a chord means to the search surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchAction {
    ToggleOpen,
    Close,
    MoveUp,
    MoveDown,
    Confirm,
    DeleteChar,
    /// Feed a literal character into the query.
    Insert(char),
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyChord, SearchAction>,
}

impl Default for Keymap {
    /// Platform+K toggles, Escape closes, arrows move, Enter selects.
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(KeyChord::platform(Key::Char('k')), SearchAction::ToggleOpen);
        bindings.insert(KeyChord::plain(Key::Escape), SearchAction::Close);
        bindings.insert(KeyChord::plain(Key::Up), SearchAction::MoveUp);
        bindings.insert(KeyChord::plain(Key::Down), SearchAction::MoveDown);
        bindings.insert(KeyChord::plain(Key::Enter), SearchAction::Confirm);
        bindings.insert(KeyChord::plain(Key::Backspace), SearchAction::DeleteChar);
        Self { bindings }
    }
}

impl Keymap {
    pub fn bind(&mut self, chord: KeyChord, action: SearchAction) {
        self.bindings.insert(chord, action);
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<SearchAction> {
        self.bindings.remove(chord)
    }

    /// Bound action for the chord. Unmodified printable characters
    /// fall through to [`SearchAction::Insert`]; anything else
    /// unbound means the event is not ours.
    pub fn resolve(&self, chord: &KeyChord) -> Option<SearchAction> {
        if let Some(action) = self.bindings.get(chord) {
            return Some(*action);
        }
        match (chord.modifier, chord.key) {
            (Modifier::None, Key::Char(c)) if !c.is_control() => Some(SearchAction::Insert(c)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_keyboard_surface() {
        let km = Keymap::default();
        assert_eq!(
            km.resolve(&KeyChord::platform(Key::Char('k'))),
            Some(SearchAction::ToggleOpen)
        );
        assert_eq!(
            km.resolve(&KeyChord::plain(Key::Escape)),
            Some(SearchAction::Close)
        );
        assert_eq!(km.resolve(&KeyChord::plain(Key::Up)), Some(SearchAction::MoveUp));
        assert_eq!(
            km.resolve(&KeyChord::plain(Key::Down)),
            Some(SearchAction::MoveDown)
        );
        assert_eq!(
            km.resolve(&KeyChord::plain(Key::Enter)),
            Some(SearchAction::Confirm)
        );
    }

    #[test]
    fn plain_characters_insert() {
        let km = Keymap::default();
        assert_eq!(
            km.resolve(&KeyChord::plain(Key::Char('x'))),
            Some(SearchAction::Insert('x'))
        );
        // Modified characters that are not bound stay unresolved.
        assert_eq!(km.resolve(&KeyChord::platform(Key::Char('x'))), None);
    }

    #[test]
    fn rebinding_and_unbinding_work() {
        let mut km = Keymap::default();
        km.bind(KeyChord::platform(Key::Char('/')), SearchAction::ToggleOpen);
        assert_eq!(
            km.resolve(&KeyChord::platform(Key::Char('/'))),
            Some(SearchAction::ToggleOpen)
        );

        km.unbind(&KeyChord::plain(Key::Escape));
        assert_eq!(km.resolve(&KeyChord::plain(Key::Escape)), None);
    }
}
