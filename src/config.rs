//! Pipeline configuration.

use crate::completion::DEFAULT_SUGGESTIONS;
use crate::error::{Error, Result};
use crate::hotkey::HotkeyMap;
use crate::key::Key;
use std::time::Duration;

/// Configuration for the completion pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Suggestions requested per query.
    pub suggestions: usize,
    /// How long the capture loop blocks before re-checking the guard.
    pub receive_timeout: Duration,
    /// Selection driver ticks per second.
    pub refresh_rate: u32,
    /// Key whose press shuts the pipeline down.
    pub exit_key: Key,
    /// Capacity of the key event channel.
    pub event_capacity: usize,
    /// Capacity of the capture → selection channel.
    pub signal_capacity: usize,
    /// Capacity of the hotkey command channel.
    pub command_capacity: usize,
    /// Chord bindings for navigation and commit.
    pub hotkeys: HotkeyMap,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            suggestions: DEFAULT_SUGGESTIONS,
            receive_timeout: Duration::from_secs(2),
            refresh_rate: 20,
            exit_key: Key::Esc,
            event_capacity: 256,
            signal_capacity: 64,
            command_capacity: 16,
            hotkeys: HotkeyMap::default(),
        }
    }
}

impl PipelineConfig {
    /// Time between selection driver ticks.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_rate.max(1)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(Error::Config {
                message: message.to_string(),
            })
        };

        if self.suggestions == 0 {
            return invalid("suggestions must be at least 1");
        }
        if !(1..=240).contains(&self.refresh_rate) {
            return invalid("refresh rate must be between 1 and 240 Hz");
        }
        if self.receive_timeout.is_zero() {
            return invalid("receive timeout must be positive");
        }
        if self.event_capacity == 0 || self.signal_capacity == 0 || self.command_capacity == 0 {
            return invalid("channel capacities must be positive");
        }
        Ok(())
    }
}
