//! Hotkey registration: fixed chords mapped to selection commands.

use crate::actor::{Command, Direction};
use crate::error::Result;
use crate::key::{Chord, Key, Modifiers};

/// Chord → command bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyMap {
    bindings: Vec<(Chord, Command)>,
}

impl HotkeyMap {
    /// A map with no bindings.
    pub const fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Build the standard three bindings from chord strings.
    pub fn parse(prev: &str, next: &str, commit: &str) -> Result<Self> {
        let mut map = Self::empty();
        map.bind(prev.parse()?, Command::Navigate(Direction::Prev));
        map.bind(next.parse()?, Command::Navigate(Direction::Next));
        map.bind(commit.parse()?, Command::Commit);
        Ok(map)
    }

    /// Bind `chord` to `command`, replacing an earlier binding of the chord.
    pub fn bind(&mut self, chord: Chord, command: Command) {
        self.bindings.retain(|(bound, _)| bound != &chord);
        self.bindings.push((chord, command));
    }

    /// The command bound to `chord`.
    pub fn lookup(&self, chord: &Chord) -> Option<Command> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == chord)
            .map(|(_, command)| *command)
    }

    /// All bindings, in registration order.
    pub fn bindings(&self) -> &[(Chord, Command)] {
        &self.bindings
    }
}

impl Default for HotkeyMap {
    /// `alt+left` / `alt+right` navigate, `ctrl+space` commits.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(
            Chord::new(Key::Left, Modifiers::ALT),
            Command::Navigate(Direction::Prev),
        );
        map.bind(
            Chord::new(Key::Right, Modifiers::ALT),
            Command::Navigate(Direction::Next),
        );
        map.bind(Chord::new(Key::Space, Modifiers::CONTROL), Command::Commit);
        map
    }
}
