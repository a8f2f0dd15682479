//! Key injection: typing text as if the user did.
//!
//! An [`Injector`] can only be driven with an [`InjectionPermit`] in hand, so
//! nothing types without first owning the guard the capture loop watches.

use crate::actor::CaptureEvent;
use crate::error::{Error, Result};
use crate::guard::InjectionPermit;
use crate::key::{Key, KeyEvent, KeyEventKind};
use crossbeam_channel::{SendTimeoutError, Sender};
use std::time::Duration;

/// How long a loopback send may wait on a full event channel.
const LOOPBACK_SEND_TIMEOUT: Duration = Duration::from_millis(250);

/// Replays literal characters as synthetic keystrokes.
pub trait Injector: Send {
    /// Type `text`. Must only be called while holding the guard.
    fn inject(&mut self, permit: &InjectionPermit, text: &str) -> Result<()>;
}

impl<T: Injector + ?Sized> Injector for Box<T> {
    fn inject(&mut self, permit: &InjectionPermit, text: &str) -> Result<()> {
        (**self).inject(permit, text)
    }
}

/// Keystrokes needed to type `text`: a press/release pair per character.
pub fn keystrokes(text: &str) -> impl Iterator<Item = KeyEvent> + '_ {
    text.chars().flat_map(|c| {
        let key = Key::from(c);
        [
            KeyEvent::new(key.clone(), KeyEventKind::Press),
            KeyEvent::new(key, KeyEventKind::Release),
        ]
    })
}

/// Injector that feeds synthetic keystrokes back into the capture loop's
/// event channel, the way a global hook reports injected input.
#[derive(Debug, Clone)]
pub struct LoopbackInjector {
    events: Sender<CaptureEvent>,
}

impl LoopbackInjector {
    /// Create an injector writing to `events`.
    pub const fn new(events: Sender<CaptureEvent>) -> Self {
        Self { events }
    }
}

impl Injector for LoopbackInjector {
    fn inject(&mut self, _permit: &InjectionPermit, text: &str) -> Result<()> {
        for event in keystrokes(text) {
            self.events
                .send_timeout(CaptureEvent::Key(event), LOOPBACK_SEND_TIMEOUT)
                .map_err(|err| match err {
                    SendTimeoutError::Timeout(_) => Error::Injection {
                        message: "event channel full".to_string(),
                    },
                    SendTimeoutError::Disconnected(_) => Error::Disconnected {
                        channel: "key event",
                    },
                })?;
        }
        tracing::debug!(chars = text.chars().count(), "looped back injected keystrokes");
        Ok(())
    }
}
