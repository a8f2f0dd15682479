//! Terminal front-end: raw mode, key source, display, and injector.

mod display;
mod injector;
mod output;
mod source;

pub use display::{fit, TerminalDisplay};
pub use injector::TerminalInjector;
pub use output::OutputBuffer;
pub use source::{route, Routed, TerminalKeySource};

use crate::error::Result;
use crossterm::{cursor, execute, terminal};
use std::io;

/// Keeps the terminal in raw mode until dropped.
pub struct RawMode {
    _private: (),
}

impl RawMode {
    /// Enter raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses raw mode.
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        tracing::debug!("raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // Restore terminal state
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}
