//! Capture Actor: Dedicated thread turning keystrokes into suggestions.
//!
//! The loop blocks on the key event channel with a timeout, feeds accepted
//! events to the [`Segmenter`], queries the completion engine for every
//! word it produces and forwards the results to the selection driver.
//! While the injection guard reports an injection, events are dropped and
//! the pending word is discarded.

use super::messages::{CaptureEvent, ControlSignal, Direction, Signal};
use crate::completion::{CompletionClient, CompletionEngine};
use crate::error::{Error, Result};
use crate::guard::InjectionGuard;
use crate::key::{Key, KeyEvent};
use crate::segment::Segmenter;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Capture loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Reading real keystrokes.
    Listening,
    /// An injection is in progress; keystrokes are not the user's.
    Suspended,
}

/// What to do after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep looping.
    Continue,
    /// The loop is done.
    Stop,
}

/// Why a cycle produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event was produced by an injection.
    Injected,
    /// The event did not yield a word to query.
    NoWord,
    /// The selection driver is not keeping up; the signal was dropped.
    Backpressure,
}

impl SkipReason {
    /// Short label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Injected => "injected",
            Self::NoWord => "no_word",
            Self::Backpressure => "backpressure",
        }
    }
}

/// Classified failure of one receive cycle.
#[derive(Debug)]
pub enum CycleError {
    /// Nothing arrived within the timeout. Loop again.
    Timeout,
    /// The event was dropped. Loop again.
    Ignorable(SkipReason),
    /// The loop cannot go on.
    Fatal(Error),
}

/// Navigation keys handled by the capture loop itself.
const fn navigation(key: &Key) -> Option<Direction> {
    match key {
        Key::Up => Some(Direction::Prev),
        Key::Down => Some(Direction::Next),
        _ => None,
    }
}

/// Capture loop settings.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Suggestions per query.
    pub suggestions: usize,
    /// Bounded wait on the event channel.
    pub receive_timeout: Duration,
    /// Key whose press acts as the shutdown sentinel.
    pub exit_key: Key,
}

/// The capture loop. Owns the segmenter and the engine client.
pub struct CaptureLoop<E> {
    events: Receiver<CaptureEvent>,
    signals: Sender<Signal>,
    client: CompletionClient<E>,
    guard: InjectionGuard,
    settings: CaptureSettings,
    segmenter: Segmenter,
    state: CaptureState,
    stop: Arc<AtomicBool>,
}

impl<E: CompletionEngine> CaptureLoop<E> {
    /// Create a listening loop.
    pub fn new(
        events: Receiver<CaptureEvent>,
        signals: Sender<Signal>,
        client: CompletionClient<E>,
        guard: InjectionGuard,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            events,
            signals,
            client,
            guard,
            settings,
            segmenter: Segmenter::new(),
            state: CaptureState::Listening,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop at the next cycle once `stop` is raised.
    ///
    /// The selection driver raises it when it exits, so a shutdown that
    /// only reached the driver still ends the capture loop.
    #[must_use]
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Current state.
    pub const fn state(&self) -> CaptureState {
        self.state
    }

    /// The segmenter, for inspection.
    pub const fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Run until the shutdown sentinel or a fatal error.
    pub fn run(mut self) {
        tracing::debug!("capture loop started");
        loop {
            match self.step() {
                Ok(Flow::Continue) | Err(CycleError::Timeout) => {}
                Ok(Flow::Stop) => break,
                Err(CycleError::Ignorable(reason)) => {
                    tracing::trace!(reason = reason.as_str(), "event skipped");
                }
                Err(CycleError::Fatal(err)) => {
                    tracing::warn!(error = %err, "capture loop failed");
                    let _ = self.signals.send_timeout(
                        Signal::Control(ControlSignal::Exit),
                        self.settings.receive_timeout,
                    );
                    break;
                }
            }
        }
        tracing::debug!("capture loop stopped");
    }

    /// Run a single receive cycle.
    pub fn step(&mut self) -> std::result::Result<Flow, CycleError> {
        if self.stop.load(Ordering::Acquire) {
            return Ok(self.shutdown(ControlSignal::Exit));
        }

        let event = match self.events.recv_timeout(self.settings.receive_timeout) {
            Ok(CaptureEvent::Key(event)) => event,
            Ok(CaptureEvent::Control(signal)) => return Ok(self.shutdown(signal)),
            Err(RecvTimeoutError::Timeout) => {
                if self.guard.is_held() {
                    self.suspend();
                } else {
                    self.state = CaptureState::Listening;
                }
                return Err(CycleError::Timeout);
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(CycleError::Fatal(Error::Disconnected {
                    channel: "key event",
                }));
            }
        };

        if event.is_press() && event.key == self.settings.exit_key {
            return Ok(self.shutdown(ControlSignal::Exit));
        }

        if self.guard.suppresses(event.time) {
            self.suspend();
            return Err(CycleError::Ignorable(SkipReason::Injected));
        }
        if self.state == CaptureState::Suspended {
            tracing::debug!("capture resumed");
            self.state = CaptureState::Listening;
        }

        self.handle_key(event)
    }

    fn handle_key(&mut self, event: KeyEvent) -> std::result::Result<Flow, CycleError> {
        let direction = navigation(&event.key).filter(|_| event.is_press());
        let query = self.segmenter.consume(event);

        if let Some(direction) = direction {
            self.forward(Signal::Navigate(direction))?;
            return Ok(Flow::Continue);
        }

        let word = query.ok_or(CycleError::Ignorable(SkipReason::NoWord))?;
        let batch = self.client.batch(&word, self.settings.suggestions);
        tracing::trace!(word = %word, found = batch.len(), "queried");
        self.forward(Signal::Suggestions(batch))?;
        Ok(Flow::Continue)
    }

    fn suspend(&mut self) {
        if self.state != CaptureState::Suspended {
            tracing::debug!("capture suspended: injection in progress");
        }
        self.state = CaptureState::Suspended;
        self.segmenter.reset();
    }

    fn forward(&self, signal: Signal) -> std::result::Result<(), CycleError> {
        match self.signals.try_send(signal) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(CycleError::Ignorable(SkipReason::Backpressure)),
            Err(TrySendError::Disconnected(_)) => Err(CycleError::Fatal(Error::Disconnected {
                channel: "selection",
            })),
        }
    }

    fn shutdown(&mut self, signal: ControlSignal) -> Flow {
        tracing::info!("capture loop received exit");
        self.segmenter.reset();
        let _ = self
            .signals
            .send_timeout(Signal::Control(signal), self.settings.receive_timeout);
        Flow::Stop
    }
}

/// Capture actor: runs a [`CaptureLoop`] on its own thread.
pub struct CaptureActor {
    /// Handle to the capture thread.
    handle: Option<JoinHandle<()>>,
}

impl CaptureActor {
    /// Spawn the capture thread.
    pub fn spawn<E>(capture: CaptureLoop<E>) -> Result<Self>
    where
        E: CompletionEngine + 'static,
    {
        let handle = thread::Builder::new()
            .name("typeahead-capture".to_string())
            .spawn(move || capture.run())?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Check whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the capture thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::SuggestionBatch;
    use crate::inject::{Injector, LoopbackInjector};
    use crossbeam_channel::bounded;
    use std::path::Path;

    struct PrefixEngine;

    impl CompletionEngine for PrefixEngine {
        fn set_dictionary(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn get_autocomplete(&self, prefix: &str, _k: usize) -> String {
            format!("{prefix}lo {prefix}p")
        }
    }

    struct Harness {
        capture: CaptureLoop<PrefixEngine>,
        events: Sender<CaptureEvent>,
        signals: Receiver<Signal>,
        guard: InjectionGuard,
    }

    fn harness() -> Harness {
        let (events_tx, events_rx) = bounded(64);
        let (signals_tx, signals_rx) = bounded(64);
        let guard = InjectionGuard::new();
        let capture = CaptureLoop::new(
            events_rx,
            signals_tx,
            CompletionClient::ready(PrefixEngine),
            guard.clone(),
            CaptureSettings {
                suggestions: 5,
                receive_timeout: Duration::from_millis(20),
                exit_key: Key::Esc,
            },
        );
        Harness {
            capture,
            events: events_tx,
            signals: signals_rx,
            guard,
        }
    }

    fn press(h: &Harness, c: char) {
        h.events.send(CaptureEvent::Key(KeyEvent::press(Key::from(c)))).unwrap();
    }

    fn drain_steps(h: &mut Harness) {
        while !h.events.is_empty() {
            let _ = h.capture.step();
        }
    }

    #[test]
    fn test_typing_forwards_batches_in_order() {
        let mut h = harness();
        for c in "hel".chars() {
            press(&h, c);
        }
        drain_steps(&mut h);

        let words: Vec<String> = h
            .signals
            .try_iter()
            .map(|s| match s {
                Signal::Suggestions(batch) => batch.queried_word,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(words, vec!["h", "he", "hel"]);
    }

    #[test]
    fn test_batch_contents() {
        let mut h = harness();
        press(&h, 'a');
        assert_eq!(h.capture.step().unwrap(), Flow::Continue);
        assert_eq!(
            h.signals.try_recv().unwrap(),
            Signal::Suggestions(SuggestionBatch::new(vec!["alo".into(), "ap".into()], "a"))
        );
    }

    #[test]
    fn test_timeout_is_not_fatal() {
        let mut h = harness();
        assert!(matches!(h.capture.step(), Err(CycleError::Timeout)));
        assert_eq!(h.capture.state(), CaptureState::Listening);
    }

    #[test]
    fn test_navigation_forwards_and_terminates_word() {
        let mut h = harness();
        press(&h, 'h');
        h.events.send(CaptureEvent::Key(KeyEvent::press(Key::Down))).unwrap();
        h.events.send(CaptureEvent::Key(KeyEvent::release(Key::Down))).unwrap();
        drain_steps(&mut h);

        assert!(matches!(h.signals.try_recv(), Ok(Signal::Suggestions(_))));
        assert_eq!(h.signals.try_recv(), Ok(Signal::Navigate(Direction::Next)));
        assert!(h.signals.try_recv().is_err());
        assert!(h.capture.segmenter().pending().is_empty());
    }

    #[test]
    fn test_control_event_forwards_and_stops() {
        let mut h = harness();
        h.events.send(CaptureEvent::Control(ControlSignal::Exit)).unwrap();
        assert_eq!(h.capture.step().unwrap(), Flow::Stop);
        assert_eq!(h.signals.try_recv(), Ok(Signal::Control(ControlSignal::Exit)));
    }

    #[test]
    fn test_raised_stop_flag_ends_loop_without_input() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut h = harness();
        h.capture = h.capture.with_stop_flag(stop.clone());

        assert!(matches!(h.capture.step(), Err(CycleError::Timeout)));
        stop.store(true, Ordering::Release);
        assert_eq!(h.capture.step().unwrap(), Flow::Stop);
        assert_eq!(h.signals.try_recv(), Ok(Signal::Control(ControlSignal::Exit)));
    }

    #[test]
    fn test_exit_key_acts_as_sentinel() {
        let mut h = harness();
        h.events.send(CaptureEvent::Key(KeyEvent::press(Key::Esc))).unwrap();
        assert_eq!(h.capture.step().unwrap(), Flow::Stop);
        assert_eq!(h.signals.try_recv(), Ok(Signal::Control(ControlSignal::Exit)));
    }

    #[test]
    fn test_disconnected_source_is_fatal() {
        let mut h = harness();
        let (dead_tx, dead_rx) = bounded::<CaptureEvent>(1);
        drop(dead_tx);
        h.capture.events = dead_rx;
        assert!(matches!(h.capture.step(), Err(CycleError::Fatal(_))));
    }

    #[test]
    fn test_injected_keystrokes_never_reach_segmenter() {
        let mut h = harness();
        press(&h, 'h');
        press(&h, 'e');
        press(&h, 'l');
        drain_steps(&mut h);
        assert_eq!(h.capture.segmenter().typed(), "hel");
        let before: Vec<Signal> = h.signals.try_iter().collect();
        assert_eq!(before.len(), 3);

        // Commit "help": the injected "p" comes back through the hook.
        let permit = h.guard.try_acquire().unwrap();
        LoopbackInjector::new(h.events.clone())
            .inject(&permit, "p")
            .unwrap();
        drop(permit);

        drain_steps(&mut h);
        assert_eq!(h.capture.state(), CaptureState::Suspended);
        assert!(h.capture.segmenter().pending().is_empty());
        assert!(h.signals.try_recv().is_err());

        // Real typing resumes from a clean token.
        press(&h, 'a');
        drain_steps(&mut h);
        assert_eq!(h.capture.state(), CaptureState::Listening);
        assert_eq!(h.capture.segmenter().typed(), "a");
        match h.signals.try_recv() {
            Ok(Signal::Suggestions(batch)) => assert_eq!(batch.queried_word, "a"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_events_while_guard_held_are_discarded() {
        let mut h = harness();
        let _permit = h.guard.try_acquire().unwrap();
        press(&h, 'x');
        assert!(matches!(
            h.capture.step(),
            Err(CycleError::Ignorable(SkipReason::Injected))
        ));
        assert!(h.capture.segmenter().pending().is_empty());

        assert!(matches!(h.capture.step(), Err(CycleError::Timeout)));
        assert_eq!(h.capture.state(), CaptureState::Suspended);
    }

    #[test]
    fn test_full_signal_channel_is_backpressure() {
        let (events_tx, events_rx) = bounded(4);
        let (signals_tx, _signals_rx) = bounded(1);
        let mut capture = CaptureLoop::new(
            events_rx,
            signals_tx,
            CompletionClient::ready(PrefixEngine),
            InjectionGuard::new(),
            CaptureSettings {
                suggestions: 5,
                receive_timeout: Duration::from_millis(20),
                exit_key: Key::Esc,
            },
        );
        events_tx.send(CaptureEvent::Key(KeyEvent::press(Key::Char('a')))).unwrap();
        events_tx.send(CaptureEvent::Key(KeyEvent::press(Key::Char('b')))).unwrap();

        assert!(capture.step().is_ok());
        assert!(matches!(
            capture.step(),
            Err(CycleError::Ignorable(SkipReason::Backpressure))
        ));
    }
}
