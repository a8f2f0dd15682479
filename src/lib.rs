//! # Typeahead
//!
//! An on-screen word completion pipeline driven by global keystrokes.
//!
//! Typeahead watches key events, works out the word currently being typed,
//! asks a completion engine for the best continuations, shows them, and on
//! request types the rest of the chosen word back as synthetic keystrokes.
//!
//! ## Core Concepts
//!
//! - **Word segmentation**: Replays pending keystrokes to recover the current word
//! - **Actor model**: Isolated threads for capture and for selection
//! - **Injection guard**: Keeps the pipeline from reacting to its own typing
//! - **Coalesced selection**: The display only ever shows the newest batch
//!
//! ## Example
//!
//! ```rust
//! use typeahead::{Segmenter, Key, KeyEvent};
//!
//! let mut segmenter = Segmenter::new();
//! segmenter.consume(KeyEvent::press(Key::Char('h')));
//! let word = segmenter.consume(KeyEvent::press(Key::Char('e')));
//! assert_eq!(word.as_deref(), Some("he"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod completion;
pub mod config;
pub mod error;
pub mod ffi;
pub mod guard;
pub mod hotkey;
pub mod inject;
pub mod key;
pub mod segment;
pub mod selection;
pub mod terminal;

// Re-exports for convenience
pub use actor::{CaptureEvent, Command, ControlSignal, Direction, Pipeline, PipelineBuilder, Signal};
pub use completion::{CompletionClient, CompletionEngine, SuggestionBatch, WordTree};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use guard::{InjectionGuard, InjectionPermit};
pub use hotkey::HotkeyMap;
pub use inject::{Injector, LoopbackInjector};
pub use key::{Chord, Key, KeyEvent, KeyEventKind, Modifiers};
pub use segment::Segmenter;
pub use selection::{CommitOutcome, DisplaySink, SelectionMachine, SelectionState};
