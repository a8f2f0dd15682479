//! Message types for actor communication.
//!
//! Each channel carries its own tagged enum, so a receiver never has to
//! guess what kind of payload it was handed:
//!
//! - key source → capture loop: [`CaptureEvent`]
//! - capture loop → selection driver: [`Signal`]
//! - hotkey source → selection driver: [`Command`]

use crate::completion::SuggestionBatch;
use crate::key::KeyEvent;

/// Sentinel that shuts the pipeline down. Never a key, never a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSignal {
    /// Stop capturing and close the display.
    Exit,
}

/// Direction to move the highlighted suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the top of the list (up, left).
    Prev,
    /// Towards the bottom of the list (down, right).
    Next,
}

impl Direction {
    /// Index delta for this direction.
    pub const fn step(self) -> isize {
        match self {
            Self::Prev => -1,
            Self::Next => 1,
        }
    }
}

/// Events delivered to the capture loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A keystroke from the hook (or an injected one looped back).
    Key(KeyEvent),
    /// Shutdown request from the controlling process.
    Control(ControlSignal),
}

/// Events sent from the capture loop to the selection driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Fresh suggestions for the word being typed.
    Suggestions(SuggestionBatch),
    /// A navigation key was pressed.
    Navigate(Direction),
    /// Commit the highlighted suggestion.
    Commit,
    /// The capture loop is shutting down.
    Control(ControlSignal),
}

/// Commands from the hotkey source to the selection driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move the highlight.
    Navigate(Direction),
    /// Type the rest of the highlighted suggestion.
    Commit,
    /// Shut the selection driver down.
    Control(ControlSignal),
}

impl From<Command> for Signal {
    fn from(command: Command) -> Self {
        match command {
            Command::Navigate(direction) => Self::Navigate(direction),
            Command::Commit => Self::Commit,
            Command::Control(signal) => Self::Control(signal),
        }
    }
}
