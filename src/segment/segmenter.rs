//! Word segmenter: accumulates key events and produces word queries.

use super::replay::{current_word, replay};
use crate::key::{Key, KeyEvent};

/// Keys dropped without touching the pending token.
pub fn is_ignored(key: &Key) -> bool {
    matches!(key, Key::Char('[' | ']') | Key::Command)
}

/// Keys that end the word being typed.
pub const fn is_terminator(key: &Key) -> bool {
    matches!(
        key,
        Key::Up | Key::Down | Key::Left | Key::Right | Key::Enter | Key::Tab
    )
}

/// Reconstructs the word currently being typed from raw key events.
///
/// Every accepted key press re-derives the word and, if it is non-empty,
/// returns it as the next query. Releases are kept for shift tracking but
/// never trigger a query on their own.
#[derive(Debug, Default)]
pub struct Segmenter {
    pending: Vec<KeyEvent>,
}

impl Segmenter {
    /// Create an empty segmenter.
    pub const fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Feed one event. Returns the word to query, if any.
    pub fn consume(&mut self, event: KeyEvent) -> Option<String> {
        if is_ignored(&event.key) {
            return None;
        }
        if is_terminator(&event.key) {
            self.reset();
            return None;
        }

        let queries = event.is_press();
        self.pending.push(event);
        if !queries {
            return None;
        }

        let word = current_word(&self.typed()).to_string();
        (!word.is_empty()).then_some(word)
    }

    /// Discard the pending token.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Events accumulated since the last boundary.
    pub fn pending(&self) -> &[KeyEvent] {
        &self.pending
    }

    /// Text produced by the pending events.
    pub fn typed(&self) -> String {
        replay(&self.pending)
    }
}
