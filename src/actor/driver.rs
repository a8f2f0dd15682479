//! Selection Driver Actor: Dedicated thread owning the selection state.
//!
//! On every tick the driver drains both inbound channels without blocking,
//! coalesces what it found down to the latest batch and the latest command
//! that arrived after it, and applies that to the [`SelectionMachine`].

use super::messages::{Command, ControlSignal, Direction, Signal};
use crate::completion::SuggestionBatch;
use crate::error::Result;
use crate::inject::Injector;
use crate::selection::{CommitOutcome, DisplaySink, SelectionMachine};
use crossbeam_channel::{tick, Receiver, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Navigation or commit, the commands that coalesce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the highlight.
    Navigate(Direction),
    /// Commit the highlighted suggestion.
    Commit,
}

/// Everything pending at one tick, coalesced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drained {
    /// Newest suggestion batch.
    pub batch: Option<SuggestionBatch>,
    /// Newest action that arrived after `batch`.
    pub action: Option<Action>,
    /// Shutdown requested.
    pub control: Option<ControlSignal>,
    /// The capture side is gone.
    pub disconnected: bool,
}

impl Drained {
    /// Fold one capture-side signal in.
    pub fn push_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Suggestions(batch) => {
                // Anything queued before a new batch targeted the old one.
                self.batch = Some(batch);
                self.action = None;
            }
            Signal::Navigate(direction) => self.action = Some(Action::Navigate(direction)),
            Signal::Commit => self.action = Some(Action::Commit),
            Signal::Control(signal) => self.control = Some(signal),
        }
    }

    /// Fold one hotkey command in.
    pub fn push_command(&mut self, command: Command) {
        self.push_signal(command.into());
    }

    /// Check whether there is nothing to apply.
    pub const fn is_empty(&self) -> bool {
        self.batch.is_none() && self.action.is_none() && self.control.is_none() && !self.disconnected
    }
}

/// Drain both channels without blocking.
///
/// Arrival order across the two channels is not observable, so hotkey
/// commands are folded in after every capture signal of the tick. A hotkey
/// pressed in the same tick as a new batch acts on that batch. Within the
/// signal channel, a batch still discards the actions queued before it.
pub fn drain(signals: &Receiver<Signal>, commands: &Receiver<Command>) -> Drained {
    let mut drained = Drained::default();

    loop {
        match signals.try_recv() {
            Ok(signal) => drained.push_signal(signal),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                drained.disconnected = true;
                break;
            }
        }
    }
    // A dropped hotkey source just means no more hotkeys.
    while let Ok(command) = commands.try_recv() {
        drained.push_command(command);
    }

    drained
}

/// Apply a coalesced tick. Returns `false` once the machine has stopped.
pub fn apply<D, I>(machine: &mut SelectionMachine<D, I>, drained: Drained) -> bool
where
    D: DisplaySink,
    I: Injector,
{
    if drained.control.is_some() || drained.disconnected {
        machine.on_control();
        return false;
    }

    if let Some(batch) = drained.batch {
        machine.on_batch(batch);
    }

    match drained.action {
        Some(Action::Navigate(direction)) => machine.on_navigate(direction),
        Some(Action::Commit) => match machine.on_commit() {
            Ok(CommitOutcome::Committed { suffix }) => {
                tracing::debug!(chars = suffix.chars().count(), "suffix injected");
            }
            Ok(CommitOutcome::NothingToCommit) => tracing::debug!("nothing to commit"),
            Ok(CommitOutcome::Busy) => tracing::debug!("commit dropped: guard busy"),
            Ok(CommitOutcome::Stopped) => {}
            Err(err) => tracing::warn!(error = %err, "commit failed"),
        },
        None => {}
    }

    !machine.is_stopped()
}

/// Selection driver actor.
pub struct DriverActor {
    /// Handle to the driver thread.
    handle: Option<JoinHandle<()>>,
}

impl DriverActor {
    /// Spawn the driver thread.
    ///
    /// # Arguments
    ///
    /// * `machine` - Selection state to drive.
    /// * `signals` - Batches and navigation from the capture loop.
    /// * `commands` - Commands from the hotkey source.
    /// * `interval` - Tick period.
    /// * `stopped` - Raised when the driver exits, whatever the reason.
    pub fn spawn<D, I>(
        machine: SelectionMachine<D, I>,
        signals: Receiver<Signal>,
        commands: Receiver<Command>,
        interval: Duration,
        stopped: Arc<AtomicBool>,
    ) -> Result<Self>
    where
        D: DisplaySink + 'static,
        I: Injector + 'static,
    {
        let handle = thread::Builder::new()
            .name("typeahead-selection".to_string())
            .spawn(move || {
                Self::run_loop(machine, &signals, &commands, interval);
                stopped.store(true, Ordering::Release);
            })?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Check whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the driver thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main driver loop: one drain per tick.
    fn run_loop<D, I>(
        mut machine: SelectionMachine<D, I>,
        signals: &Receiver<Signal>,
        commands: &Receiver<Command>,
        interval: Duration,
    ) where
        D: DisplaySink,
        I: Injector,
    {
        tracing::debug!(interval_ms = interval.as_millis(), "selection driver started");
        let ticks = tick(interval);
        while ticks.recv().is_ok() {
            let drained = drain(signals, commands);
            if drained.is_empty() {
                continue;
            }
            if !apply(&mut machine, drained) {
                break;
            }
        }
        machine.on_control();
        tracing::debug!("selection driver stopped");
    }
}
