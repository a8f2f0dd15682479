//! Terminal injector: types a suffix at the cursor.

use crate::error::Result;
use crate::guard::InjectionPermit;
use crate::inject::{Injector, LoopbackInjector};
use std::io::{self, Stdout, Write};

/// Writes injected text to the terminal, then reports the synthetic
/// keystrokes back to the capture loop the way an OS hook sees its own
/// injected input.
pub struct TerminalInjector<W = Stdout> {
    writer: W,
    loopback: LoopbackInjector,
}

impl TerminalInjector<Stdout> {
    /// Type into stdout.
    pub fn new(loopback: LoopbackInjector) -> Self {
        Self::with_writer(io::stdout(), loopback)
    }
}

impl<W: Write> TerminalInjector<W> {
    /// Type into `writer`.
    pub const fn with_writer(writer: W, loopback: LoopbackInjector) -> Self {
        Self { writer, loopback }
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write + Send> Injector for TerminalInjector<W> {
    fn inject(&mut self, permit: &InjectionPermit, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        self.loopback.inject(permit, text)
    }
}
