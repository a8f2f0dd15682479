//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the completion pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a dictionary file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A dictionary line could not be parsed.
    #[error("invalid dictionary entry at line {line}: {message}")]
    Dictionary {
        /// 1-based line number of the offending entry.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// The completion engine could not be brought up.
    #[error("completion engine unavailable: {reason}")]
    EngineUnavailable {
        /// Why the engine is unusable.
        reason: String,
    },

    /// A hotkey chord string could not be parsed.
    #[error("invalid chord `{spec}`: {message}")]
    InvalidChord {
        /// The chord as written by the user.
        spec: String,
        /// What was wrong with it.
        message: &'static str,
    },

    /// The configuration is not usable.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid value.
        message: String,
    },

    /// Synthetic keystrokes could not be delivered.
    #[error("injection failed: {message}")]
    Injection {
        /// Description of the failure.
        message: String,
    },

    /// The other end of a pipeline channel went away.
    #[error("{channel} channel disconnected")]
    Disconnected {
        /// Which channel.
        channel: &'static str,
    },

    /// Terminal, thread or other OS-level I/O failed.
    #[error("system error: {0}")]
    System(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
