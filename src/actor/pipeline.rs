//! Pipeline: Main coordinator that ties actors together.
//!
//! The pipeline creates the three channels and the shared injection guard,
//! spawns the capture and selection actors, and hands out senders for the
//! key source and the hotkey source. A stop flag raised by the driver on
//! exit ends the capture loop within one receive timeout, so a shutdown
//! arriving on either side stops both actors.

use super::capture::{CaptureActor, CaptureLoop, CaptureSettings};
use super::driver::DriverActor;
use super::messages::{CaptureEvent, Command, ControlSignal, Signal};
use crate::completion::{CompletionClient, CompletionEngine};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::guard::InjectionGuard;
use crate::inject::Injector;
use crate::selection::{DisplaySink, SelectionMachine};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Channels and guard, created before the actors so collaborators such as
/// a loopback injector can be wired to them.
pub struct PipelineBuilder {
    config: PipelineConfig,
    guard: InjectionGuard,
    events: (Sender<CaptureEvent>, Receiver<CaptureEvent>),
    signals: (Sender<Signal>, Receiver<Signal>),
    commands: (Sender<Command>, Receiver<Command>),
}

impl PipelineBuilder {
    /// Create the channels for `config`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            events: bounded(config.event_capacity),
            signals: bounded(config.signal_capacity),
            commands: bounded(config.command_capacity),
            guard: InjectionGuard::new(),
            config,
        })
    }

    /// Sender for key events (the key-event source end).
    pub fn event_sender(&self) -> Sender<CaptureEvent> {
        self.events.0.clone()
    }

    /// Sender for hotkey commands.
    pub fn command_sender(&self) -> Sender<Command> {
        self.commands.0.clone()
    }

    /// The shared injection guard.
    pub const fn guard(&self) -> &InjectionGuard {
        &self.guard
    }

    /// The configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Spawn the capture and selection actors.
    pub fn start<E, D, I>(
        self,
        client: CompletionClient<E>,
        display: D,
        injector: I,
    ) -> Result<Pipeline>
    where
        E: CompletionEngine + 'static,
        D: DisplaySink + 'static,
        I: Injector + 'static,
    {
        let Self {
            config,
            guard,
            events: (events_tx, events_rx),
            signals: (signals_tx, signals_rx),
            commands: (commands_tx, commands_rx),
        } = self;

        let stopped = Arc::new(AtomicBool::new(false));
        let machine = SelectionMachine::new(display, injector, guard.clone());
        let driver = DriverActor::spawn(
            machine,
            signals_rx,
            commands_rx,
            config.refresh_interval(),
            Arc::clone(&stopped),
        )?;

        let capture = CaptureLoop::new(
            events_rx,
            signals_tx,
            client,
            guard.clone(),
            CaptureSettings {
                suggestions: config.suggestions,
                receive_timeout: config.receive_timeout,
                exit_key: config.exit_key.clone(),
            },
        )
        .with_stop_flag(stopped);
        let capture = match CaptureActor::spawn(capture) {
            Ok(actor) => actor,
            Err(err) => {
                // The signal sender went down with the loop; the driver sees
                // the disconnect and stops.
                driver.join();
                return Err(err);
            }
        };

        tracing::info!(
            suggestions = config.suggestions,
            refresh_rate = config.refresh_rate,
            "pipeline started"
        );

        Ok(Pipeline {
            events: events_tx,
            commands: commands_tx,
            guard,
            capture: Some(capture),
            driver: Some(driver),
        })
    }
}

/// A running pipeline.
pub struct Pipeline {
    events: Sender<CaptureEvent>,
    commands: Sender<Command>,
    guard: InjectionGuard,
    capture: Option<CaptureActor>,
    driver: Option<DriverActor>,
}

impl Pipeline {
    /// Sender for key events.
    pub fn event_sender(&self) -> Sender<CaptureEvent> {
        self.events.clone()
    }

    /// Sender for hotkey commands.
    pub fn command_sender(&self) -> Sender<Command> {
        self.commands.clone()
    }

    /// The shared injection guard.
    pub const fn guard(&self) -> &InjectionGuard {
        &self.guard
    }

    /// Check whether both actors have exited.
    pub fn is_finished(&self) -> bool {
        self.capture.as_ref().map_or(true, CaptureActor::is_finished)
            && self.driver.as_ref().map_or(true, DriverActor::is_finished)
    }

    /// Ask the capture loop to stop; it forwards the sentinel downstream.
    pub fn shutdown(&self) {
        let _ = self.events.send(CaptureEvent::Control(ControlSignal::Exit));
    }

    /// Wait for both actors to exit.
    pub fn join(mut self) {
        self.join_actors();
    }

    fn join_actors(&mut self) {
        if let Some(capture) = self.capture.take() {
            capture.join();
        }
        if let Some(driver) = self.driver.take() {
            driver.join();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if self.capture.is_some() || self.driver.is_some() {
            self.shutdown();
            self.join_actors();
        }
    }
}
