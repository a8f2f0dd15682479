//! Hotkey chords: a key plus held modifiers.

use super::Key;
use crate::error::{Error, Result};
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Modifiers held while a chord's key is pressed.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use typeahead::Modifiers;
    /// let held = Modifiers::CONTROL | Modifiers::SHIFT;
    /// assert!(held.contains(Modifiers::SHIFT));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift key held.
        const SHIFT = 0b0000_0001;
        /// Control key held.
        const CONTROL = 0b0000_0010;
        /// Alt/Option key held.
        const ALT = 0b0000_0100;
        /// Super/Command/Windows key held.
        const SUPER = 0b0000_1000;
    }
}

impl Modifiers {
    fn from_part(part: &str) -> Option<Self> {
        match part.to_ascii_lowercase().as_str() {
            "shift" => Some(Self::SHIFT),
            "ctrl" | "control" => Some(Self::CONTROL),
            "alt" | "option" => Some(Self::ALT),
            "super" | "cmd" | "command" | "win" | "windows" => Some(Self::SUPER),
            _ => None,
        }
    }
}

/// A key combination bound to a command, e.g. `ctrl+space`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    /// The key that completes the chord.
    pub key: Key,
    /// Modifiers that must be held.
    pub modifiers: Modifiers,
}

impl Chord {
    /// Create a chord.
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A bare key with no modifiers.
    pub const fn key(key: Key) -> Self {
        Self::new(key, Modifiers::empty())
    }
}

impl FromStr for Chord {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        let invalid = |message| Error::InvalidChord {
            spec: spec.to_string(),
            message,
        };

        let mut parts: Vec<&str> = spec.split('+').map(str::trim).collect();
        let key_part = parts.pop().filter(|p| !p.is_empty()).ok_or_else(|| invalid("missing key"))?;

        let mut modifiers = Modifiers::empty();
        for part in parts {
            if part.is_empty() {
                return Err(invalid("empty modifier"));
            }
            modifiers |= Modifiers::from_part(part).ok_or_else(|| invalid("unknown modifier"))?;
        }

        Ok(Self::new(Key::from_name(key_part), modifiers))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CONTROL, "ctrl"),
            (Modifiers::ALT, "alt"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::SUPER, "super"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}
