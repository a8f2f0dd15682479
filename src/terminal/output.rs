//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use std::fmt::Write as _;
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// so the suggestion list never shows up half drawn.
pub struct OutputBuffer {
    data: String,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: String::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a small overlay (1KB).
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.push_str(s);
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
    }

    /// Save the cursor position.
    #[inline]
    pub fn cursor_save(&mut self) {
        self.data.push_str("\x1b7");
    }

    /// Restore the saved cursor position.
    #[inline]
    pub fn cursor_restore(&mut self) {
        self.data.push_str("\x1b8");
    }

    /// Erase the whole current line.
    #[inline]
    pub fn clear_line(&mut self) {
        self.data.push_str("\x1b[2K");
    }

    /// Swap foreground and background.
    #[inline]
    pub fn reverse(&mut self) {
        self.data.push_str("\x1b[7m");
    }

    /// Dim text.
    #[inline]
    pub fn dim(&mut self) {
        self.data.push_str("\x1b[2m");
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.push_str("\x1b[0m");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.data.as_bytes())?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
