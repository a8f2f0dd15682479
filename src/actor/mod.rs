//! Actor Model: Message-passing concurrency for the completion pipeline.
//!
//! This module implements a simple actor system using crossbeam channels:
//! - **Capture Actor**: Reads key events, segments words, queries the engine
//! - **Selection Driver**: Ticks at a fixed rate, applies batches and commands
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ CaptureEvent ┌──────────────┐    Signal    ┌──────────────┐
//! │ Key Source │ ───────────▶ │   Capture    │ ───────────▶ │  Selection   │
//! └────────────┘              │     Loop     │              │    Driver    │
//!       ▲                     └──────────────┘              └──────────────┘
//!       │                            ┆ checks                ▲    │ inject
//!       │                     ┌──────────────┐    Command    │    ▼
//!       │                     │ Injection    │ ┌───────────┐ │ ┌──────────┐
//!       │                     │ Guard        │ │  Hotkeys  │─┘ │ Injector │
//!       │                     └──────────────┘ └───────────┘   └──────────┘
//!       └──────────────────── synthetic keystrokes ─────────────────┘
//! ```

mod capture;
mod driver;
mod messages;
mod pipeline;

pub use capture::{CaptureActor, CaptureLoop, CaptureSettings, CaptureState, CycleError, Flow, SkipReason};
pub use driver::{apply, drain, Action, DriverActor, Drained};
pub use messages::{CaptureEvent, Command, ControlSignal, Direction, Signal};
pub use pipeline::{Pipeline, PipelineBuilder};
