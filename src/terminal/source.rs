//! Terminal key source: crossterm events routed into the pipeline.
//!
//! Plain keys become [`KeyEvent`]s on the capture channel. Chords bound in
//! the [`HotkeyMap`] become [`Command`]s on the hotkey channel. Ctrl+C asks
//! the pipeline to exit.

use crate::actor::{CaptureEvent, Command, ControlSignal};
use crate::error::{Error, Result};
use crate::hotkey::HotkeyMap;
use crate::key::{Chord, Key, KeyEvent, KeyEventKind, Modifiers};
use crossbeam_channel::{Sender, TrySendError};
use crossterm::event::{self, Event};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Where a terminal event goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// A key for the capture loop.
    Key(KeyEvent),
    /// A hotkey command for the selection driver.
    Command(Command),
    /// Shut the pipeline down.
    Exit,
}

/// Reads terminal events and feeds both pipeline sources.
pub struct TerminalKeySource<W = Stdout> {
    events: Sender<CaptureEvent>,
    commands: Sender<Command>,
    hotkeys: HotkeyMap,
    echo: W,
    poll_timeout: Duration,
}

impl TerminalKeySource<Stdout> {
    /// Create a source echoing typed text to stdout.
    pub fn new(events: Sender<CaptureEvent>, commands: Sender<Command>, hotkeys: HotkeyMap) -> Self {
        Self::with_writer(events, commands, hotkeys, io::stdout())
    }
}

impl<W: Write> TerminalKeySource<W> {
    /// Create a source echoing typed text to `echo`.
    pub fn with_writer(
        events: Sender<CaptureEvent>,
        commands: Sender<Command>,
        hotkeys: HotkeyMap,
        echo: W,
    ) -> Self {
        Self {
            events,
            commands,
            hotkeys,
            echo,
            poll_timeout: Duration::from_millis(50),
        }
    }

    /// Poll the terminal until `finished` reports true or the user exits.
    ///
    /// # Errors
    ///
    /// Returns an error if polling the terminal fails.
    pub fn run(&mut self, finished: impl Fn() -> bool) -> Result<()> {
        loop {
            if finished() {
                return Ok(());
            }
            if !event::poll(self.poll_timeout)? {
                continue;
            }
            let Some(routed) = route(&event::read()?, &self.hotkeys) else {
                continue;
            };
            if !self.dispatch(routed)? {
                return Ok(());
            }
        }
    }

    /// Deliver one routed event. Returns `false` once the source should stop.
    ///
    /// # Errors
    ///
    /// Returns an error if echoing to the terminal fails.
    pub fn dispatch(&mut self, routed: Routed) -> Result<bool> {
        match routed {
            Routed::Key(key_event) => {
                if key_event.is_press() {
                    self.echo(&key_event.key)?;
                }
                if self.events.send(CaptureEvent::Key(key_event)).is_err() {
                    tracing::debug!("capture loop gone, key source stopping");
                    return Ok(false);
                }
                Ok(true)
            }
            Routed::Command(command) => {
                match self.commands.try_send(command) {
                    Ok(()) | Err(TrySendError::Disconnected(_)) => {}
                    Err(TrySendError::Full(_)) => tracing::debug!(?command, "hotkey dropped"),
                }
                Ok(true)
            }
            Routed::Exit => {
                self.events
                    .send(CaptureEvent::Control(ControlSignal::Exit))
                    .map_err(|_| Error::Disconnected { channel: "key event" })?;
                Ok(false)
            }
        }
    }

    fn echo(&mut self, key: &Key) -> Result<()> {
        match key {
            Key::Char(c) => write!(self.echo, "{c}")?,
            Key::Space => self.echo.write_all(b" ")?,
            Key::Backspace => self.echo.write_all(b"\x08 \x08")?,
            Key::Enter => self.echo.write_all(b"\r\n")?,
            _ => return Ok(()),
        }
        self.echo.flush()?;
        Ok(())
    }
}

/// Decide where a crossterm event goes.
pub fn route(event: &Event, hotkeys: &HotkeyMap) -> Option<Routed> {
    let Event::Key(key_event) = event else {
        return None;
    };

    let key = convert_key_code(key_event.code)?;
    let modifiers = convert_modifiers(key_event.modifiers);
    let kind = match key_event.kind {
        event::KeyEventKind::Press | event::KeyEventKind::Repeat => KeyEventKind::Press,
        event::KeyEventKind::Release => KeyEventKind::Release,
    };

    if kind == KeyEventKind::Press {
        if modifiers == Modifiers::CONTROL && key == Key::Char('c') {
            return Some(Routed::Exit);
        }
        if let Some(command) = hotkeys.lookup(&Chord::new(key.clone(), modifiers)) {
            return Some(Routed::Command(command));
        }
    }

    // Unbound chords are not text.
    if modifiers.intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::SUPER) {
        return None;
    }

    Some(Routed::Key(KeyEvent::new(key, kind)))
}

/// Convert a crossterm key code to our key.
fn convert_key_code(code: event::KeyCode) -> Option<Key> {
    Some(match code {
        event::KeyCode::Char(' ') => Key::Space,
        event::KeyCode::Char(c) => Key::Char(c),
        event::KeyCode::F(n) => Key::F(n),
        event::KeyCode::Backspace => Key::Backspace,
        event::KeyCode::Enter => Key::Enter,
        event::KeyCode::Left => Key::Left,
        event::KeyCode::Right => Key::Right,
        event::KeyCode::Up => Key::Up,
        event::KeyCode::Down => Key::Down,
        event::KeyCode::Home => Key::Home,
        event::KeyCode::End => Key::End,
        event::KeyCode::PageUp => Key::PageUp,
        event::KeyCode::PageDown => Key::PageDown,
        event::KeyCode::Tab | event::KeyCode::BackTab => Key::Tab,
        event::KeyCode::Delete => Key::Delete,
        event::KeyCode::Insert => Key::Insert,
        event::KeyCode::Esc => Key::Esc,
        event::KeyCode::CapsLock => Key::CapsLock,
        _ => return None,
    })
}

/// Convert crossterm modifiers to ours.
fn convert_modifiers(mods: event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(event::KeyModifiers::SHIFT));
    out.set(Modifiers::CONTROL, mods.contains(event::KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(event::KeyModifiers::ALT));
    out.set(Modifiers::SUPER, mods.contains(event::KeyModifiers::SUPER));
    out
}
