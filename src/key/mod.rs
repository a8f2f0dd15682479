//! Key model: physical keys, timestamped key events and hotkey chords.
//!
//! Keys carry the keyboard-style names a global hook reports (`"a"`,
//! `"space"`, `"right shift"`, `"caps lock"`). Every event is stamped with
//! the instant it was observed so the injection guard can tell synthetic
//! keystrokes apart from real typing.

mod chord;

pub use chord::{Chord, Modifiers};

use std::fmt;
use std::time::Instant;

/// A physical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key producing a single character.
    Char(char),
    /// Space bar.
    Space,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Escape key.
    Esc,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Function key (F1-F24).
    F(u8),
    /// Left (or unsided) shift.
    Shift,
    /// Right shift.
    RightShift,
    /// Control, either side.
    Control,
    /// Alt/Option, either side.
    Alt,
    /// Command/Super/Windows key.
    Command,
    /// Caps Lock.
    CapsLock,
    /// Any key name we do not model.
    Other(String),
}

impl Key {
    /// Parse a keyboard-style key name.
    ///
    /// Unknown names never fail; they become [`Key::Other`].
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return if c == ' ' { Self::Space } else { Self::Char(c) };
        }

        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "space" | "spacebar" => Self::Space,
            "enter" | "return" => Self::Enter,
            "tab" => Self::Tab,
            "backspace" => Self::Backspace,
            "esc" | "escape" => Self::Esc,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "home" => Self::Home,
            "end" => Self::End,
            "page up" | "pageup" | "pgup" => Self::PageUp,
            "page down" | "pagedown" | "pgdn" => Self::PageDown,
            "delete" | "del" => Self::Delete,
            "insert" | "ins" => Self::Insert,
            "shift" | "left shift" => Self::Shift,
            "right shift" => Self::RightShift,
            "ctrl" | "control" | "left ctrl" | "right ctrl" => Self::Control,
            "alt" | "option" | "left alt" | "right alt" | "alt gr" => Self::Alt,
            "command" | "cmd" | "super" | "windows" | "left windows" | "right windows" => {
                Self::Command
            }
            "caps lock" | "capslock" => Self::CapsLock,
            other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n) if (1..=24).contains(&n) => Self::F(n),
                _ => Self::Other(name.to_string()),
            },
        }
    }

    /// Canonical name of this key.
    pub fn name(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::F(n) => format!("f{n}"),
            Self::Other(name) => name.clone(),
            named => named.static_name().to_string(),
        }
    }

    fn static_name(&self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::Backspace => "backspace",
            Self::Esc => "esc",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
            Self::End => "end",
            Self::PageUp => "page up",
            Self::PageDown => "page down",
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Shift => "shift",
            Self::RightShift => "right shift",
            Self::Control => "ctrl",
            Self::Alt => "alt",
            Self::Command => "command",
            Self::CapsLock => "caps lock",
            Self::Char(_) | Self::F(_) | Self::Other(_) => "",
        }
    }

    /// Either shift key.
    pub const fn is_shift(&self) -> bool {
        matches!(self, Self::Shift | Self::RightShift)
    }

    /// Keys that only change the meaning of other keys.
    pub const fn is_modifier(&self) -> bool {
        matches!(
            self,
            Self::Shift | Self::RightShift | Self::Control | Self::Alt | Self::Command | Self::CapsLock
        )
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::F(n) => write!(f, "f{n}"),
            Self::Other(name) => f.write_str(name),
            named => f.write_str(named.static_name()),
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        if c == ' ' {
            Self::Space
        } else {
            Self::Char(c)
        }
    }
}

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// Key pressed.
    Press,
    /// Key released.
    Release,
}

/// A single keystroke as delivered by a key-event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key involved.
    pub key: Key,
    /// Press or release.
    pub kind: KeyEventKind,
    /// When the source observed the event.
    pub time: Instant,
}

impl KeyEvent {
    /// Create an event observed now.
    pub fn new(key: Key, kind: KeyEventKind) -> Self {
        Self::at(key, kind, Instant::now())
    }

    /// Create an event observed at `time`.
    pub const fn at(key: Key, kind: KeyEventKind, time: Instant) -> Self {
        Self { key, kind, time }
    }

    /// A key press observed now.
    pub fn press(key: Key) -> Self {
        Self::new(key, KeyEventKind::Press)
    }

    /// A key release observed now.
    pub fn release(key: Key) -> Self {
        Self::new(key, KeyEventKind::Release)
    }

    /// Check if this is a press.
    pub fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    /// Canonical name of the key.
    pub fn name(&self) -> String {
        self.key.name()
    }
}
