//! Terminal display sink: the suggestion list on the bottom rows.

use super::output::OutputBuffer;
use crate::selection::DisplaySink;
use crossterm::terminal;
use std::io::{self, Stdout, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Draws suggestions as a list pinned to the bottom of the terminal, with
/// the highlighted row in reverse video. The cursor is saved and restored
/// around every draw so typing continues where it was.
pub struct TerminalDisplay<W = Stdout> {
    writer: W,
    rows: u16,
    size: Option<(u16, u16)>,
    suggestions: Vec<String>,
    highlighted: usize,
    out: OutputBuffer,
}

impl TerminalDisplay<Stdout> {
    /// Draw up to `rows` suggestions on stdout.
    pub fn new(rows: u16) -> Self {
        Self::with_writer(io::stdout(), rows)
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Draw up to `rows` suggestions on `writer`.
    pub fn with_writer(writer: W, rows: u16) -> Self {
        Self {
            writer,
            rows,
            size: None,
            suggestions: Vec::new(),
            highlighted: 0,
            out: OutputBuffer::new(),
        }
    }

    /// Use a fixed terminal size instead of querying the terminal.
    #[must_use]
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Suggestions currently shown.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Row currently highlighted.
    pub const fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    fn size(&self) -> (u16, u16) {
        self.size
            .or_else(|| terminal::size().ok())
            .unwrap_or((80, 24))
    }

    fn draw(&mut self) {
        let (width, height) = self.size();
        let rows = self.rows.min(height);
        let top = height - rows;

        self.out.clear();
        self.out.cursor_save();
        for row in 0..rows {
            self.out.cursor_move(0, top + row);
            self.out.clear_line();

            let index = usize::from(row);
            let Some(text) = self.suggestions.get(index) else {
                continue;
            };
            if index == self.highlighted {
                self.out.reverse();
            } else {
                self.out.dim();
            }
            self.out.write_str(fit(text, usize::from(width)));
            self.out.reset_attrs();
        }
        self.out.cursor_restore();

        if let Err(err) = self.out.flush_to(&mut self.writer) {
            tracing::warn!(error = %err, "failed to draw suggestions");
        }
    }
}

impl<W: Write + Send> DisplaySink for TerminalDisplay<W> {
    fn set_suggestions(&mut self, suggestions: &[String]) {
        self.suggestions = suggestions.to_vec();
        self.highlighted = 0;
        self.draw();
    }

    fn set_highlighted(&mut self, index: usize) {
        if index == self.highlighted {
            return;
        }
        self.highlighted = index;
        self.draw();
    }
}

/// Longest prefix of `text` whose display width fits in `width` columns.
pub fn fit(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (offset, grapheme) in text.grapheme_indices(true) {
        used += grapheme.width();
        if used > width {
            return &text[..offset];
        }
    }
    text
}
