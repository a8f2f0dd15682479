//! Selection state machine: which suggestion is highlighted, and committing it.
//!
//! ```text
//!            on_batch(non-empty)
//!   ┌──────┐ ───────────────────▶ ┌────────────┐
//!   │ Idle │                      │ Displaying │ ◀─┐ on_navigate / on_batch
//!   └──────┘ ◀─────────────────── └────────────┘ ──┘
//!       │     on_commit / on_batch(empty)  │
//!       │ on_control                       │ on_control
//!       ▼                                  ▼
//!   ┌───────────────────────────────────────────┐
//!   │                  Stopped                  │
//!   └───────────────────────────────────────────┘
//! ```

use crate::actor::Direction;
use crate::completion::SuggestionBatch;
use crate::error::Result;
use crate::guard::InjectionGuard;
use crate::inject::Injector;

/// Renders the suggestion list. Owns no selection logic.
pub trait DisplaySink: Send {
    /// Replace the displayed suggestions. An empty slice hides the list.
    ///
    /// A non-empty list is always followed by `set_highlighted(0)`, so sinks
    /// may skip redrawing a highlight that did not move.
    fn set_suggestions(&mut self, suggestions: &[String]);

    /// Highlight the entry at `index`.
    fn set_highlighted(&mut self, index: usize);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn set_suggestions(&mut self, suggestions: &[String]) {
        (**self).set_suggestions(suggestions);
    }

    fn set_highlighted(&mut self, index: usize) {
        (**self).set_highlighted(index);
    }
}

/// Where the machine is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing to show.
    #[default]
    Idle,
    /// A non-empty batch is on screen.
    Displaying {
        /// The batch being shown.
        batch: SuggestionBatch,
        /// Unbounded counter, dereferenced modulo the batch length.
        selected: isize,
    },
    /// Shut down. Final.
    Stopped,
}

/// What a commit request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The suffix was typed.
    Committed {
        /// Characters injected after the queried word.
        suffix: String,
    },
    /// Nothing was displayed.
    NothingToCommit,
    /// Another injection holds the guard.
    Busy,
    /// The machine is stopped.
    Stopped,
}

/// Tracks the displayed batch and the highlighted entry, and commits.
pub struct SelectionMachine<D, I> {
    state: SelectionState,
    display: D,
    injector: I,
    guard: InjectionGuard,
}

impl<D: DisplaySink, I: Injector> SelectionMachine<D, I> {
    /// Create an idle machine.
    pub const fn new(display: D, injector: I, guard: InjectionGuard) -> Self {
        Self {
            state: SelectionState::Idle,
            display,
            injector,
            guard,
        }
    }

    /// Current state.
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Check whether the machine has stopped.
    pub const fn is_stopped(&self) -> bool {
        matches!(self.state, SelectionState::Stopped)
    }

    /// Raw selection counter, if displaying.
    pub const fn selected_index(&self) -> Option<isize> {
        match &self.state {
            SelectionState::Displaying { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    /// Position of the highlighted entry within the batch.
    pub fn highlighted_index(&self) -> Option<usize> {
        match &self.state {
            SelectionState::Displaying { batch, selected } => Some(wrap(*selected, batch.len())),
            _ => None,
        }
    }

    /// The highlighted suggestion.
    pub fn highlighted(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Displaying { batch, selected } => {
                Some(batch.suggestions[wrap(*selected, batch.len())].as_str())
            }
            _ => None,
        }
    }

    /// The display sink.
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// The injector.
    pub const fn injector(&self) -> &I {
        &self.injector
    }

    /// Replace the batch and highlight its first entry.
    pub fn on_batch(&mut self, batch: SuggestionBatch) {
        if self.is_stopped() {
            return;
        }
        if batch.is_empty() {
            tracing::trace!(word = %batch.queried_word, "no suggestions");
            self.display.set_suggestions(&[]);
            self.state = SelectionState::Idle;
            return;
        }

        self.display.set_suggestions(&batch.suggestions);
        self.display.set_highlighted(0);
        self.state = SelectionState::Displaying { batch, selected: 0 };
    }

    /// Move the highlight one step. No-op unless displaying.
    pub fn on_navigate(&mut self, direction: Direction) {
        let SelectionState::Displaying { batch, selected } = &mut self.state else {
            return;
        };
        *selected = selected.wrapping_add(direction.step());
        let index = wrap(*selected, batch.len());
        self.display.set_highlighted(index);
    }

    /// Type the rest of the highlighted suggestion and go idle.
    pub fn on_commit(&mut self) -> Result<CommitOutcome> {
        let (word, suffix) = match &self.state {
            SelectionState::Stopped => return Ok(CommitOutcome::Stopped),
            SelectionState::Idle => {
                tracing::debug!("commit with nothing displayed");
                return Ok(CommitOutcome::NothingToCommit);
            }
            SelectionState::Displaying { batch, selected } => {
                let suggestion = &batch.suggestions[wrap(*selected, batch.len())];
                (suggestion.clone(), commit_suffix(&batch.queried_word, suggestion).to_string())
            }
        };

        if !suffix.is_empty() {
            let Some(permit) = self.guard.try_acquire() else {
                tracing::debug!("commit skipped: injection already in progress");
                return Ok(CommitOutcome::Busy);
            };
            self.injector.inject(&permit, &suffix)?;
            // The injection window closes before the list is cleared.
            drop(permit);
        }

        tracing::info!(suggestion = %word, "completion committed");
        self.state = SelectionState::Idle;
        self.display.set_suggestions(&[]);
        Ok(CommitOutcome::Committed { suffix })
    }

    /// Stop for good. Nothing is processed afterwards.
    pub fn on_control(&mut self) {
        if !self.is_stopped() {
            tracing::info!("selection stopped");
        }
        self.state = SelectionState::Stopped;
    }
}

/// Characters of `suggestion` beyond `queried_word`.
pub fn commit_suffix<'a>(queried_word: &str, suggestion: &'a str) -> &'a str {
    if let Some(rest) = suggestion.strip_prefix(queried_word) {
        return rest;
    }
    let skip = queried_word.chars().count();
    suggestion
        .char_indices()
        .nth(skip)
        .map_or("", |(index, _)| &suggestion[index..])
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn wrap(selected: isize, len: usize) -> usize {
    debug_assert!(len > 0, "selection index dereferenced against an empty batch");
    selected.rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::guard::InjectionPermit;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Suggestions(Vec<String>),
        Highlight(usize),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        calls: Vec<Call>,
    }

    impl DisplaySink for RecordingDisplay {
        fn set_suggestions(&mut self, suggestions: &[String]) {
            self.calls.push(Call::Suggestions(suggestions.to_vec()));
        }

        fn set_highlighted(&mut self, index: usize) {
            self.calls.push(Call::Highlight(index));
        }
    }

    #[derive(Default)]
    struct RecordingInjector {
        typed: Vec<String>,
        fail: bool,
    }

    impl Injector for RecordingInjector {
        fn inject(&mut self, _permit: &InjectionPermit, text: &str) -> Result<()> {
            if self.fail {
                return Err(Error::Injection {
                    message: "refused".to_string(),
                });
            }
            self.typed.push(text.to_string());
            Ok(())
        }
    }

    fn machine() -> SelectionMachine<RecordingDisplay, RecordingInjector> {
        SelectionMachine::new(
            RecordingDisplay::default(),
            RecordingInjector::default(),
            InjectionGuard::new(),
        )
    }

    fn hel_batch() -> SuggestionBatch {
        SuggestionBatch::new(
            ["hello", "help", "helicopter", "held", "helium"]
                .map(String::from)
                .to_vec(),
            "hel",
        )
    }

    #[test]
    fn test_batch_enters_displaying_at_zero() {
        let mut m = machine();
        m.on_batch(hel_batch());
        assert_eq!(m.selected_index(), Some(0));
        assert_eq!(m.highlighted(), Some("hello"));
        assert_eq!(m.display().calls.last(), Some(&Call::Highlight(0)));
    }

    #[test]
    fn test_new_batch_resets_selection() {
        let mut m = machine();
        m.on_batch(hel_batch());
        m.on_navigate(Direction::Next);
        m.on_navigate(Direction::Next);
        m.on_batch(SuggestionBatch::new(vec!["helps".into()], "help"));
        assert_eq!(m.selected_index(), Some(0));
        assert_eq!(m.highlighted(), Some("helps"));
    }

    #[test]
    fn test_empty_batch_goes_idle() {
        let mut m = machine();
        m.on_batch(hel_batch());
        m.on_batch(SuggestionBatch::new(Vec::new(), "helx"));
        assert_eq!(m.state(), &SelectionState::Idle);
        assert_eq!(m.display().calls.last(), Some(&Call::Suggestions(Vec::new())));
    }

    #[test]
    fn test_navigation_wraps_modulo_batch() {
        let mut m = machine();
        m.on_batch(hel_batch());

        m.on_navigate(Direction::Prev);
        assert_eq!(m.selected_index(), Some(-1));
        assert_eq!(m.highlighted(), Some("helium"));

        for _ in 0..6 {
            m.on_navigate(Direction::Next);
        }
        // -1 + 6 == 5 == 0 mod 5
        assert_eq!(m.highlighted_index(), Some(0));
        m.on_navigate(Direction::Next);
        assert_eq!(m.highlighted(), Some("help"));
    }

    #[test]
    fn test_index_and_index_plus_len_agree() {
        let batch = hel_batch();
        let n = isize::try_from(batch.len()).unwrap();
        for i in -7..7 {
            assert_eq!(wrap(i, batch.len()), wrap(i + n, batch.len()));
        }
    }

    #[test]
    fn test_navigate_when_idle_is_noop() {
        let mut m = machine();
        m.on_navigate(Direction::Next);
        assert_eq!(m.state(), &SelectionState::Idle);
        assert!(m.display().calls.is_empty());
    }

    #[test]
    fn test_commit_injects_suffix_and_goes_idle() {
        let mut m = machine();
        m.on_batch(hel_batch());
        m.on_navigate(Direction::Next);

        let outcome = m.on_commit().unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { suffix: "p".into() });
        assert_eq!(m.injector().typed, vec!["p"]);
        assert_eq!(m.state(), &SelectionState::Idle);
        assert_eq!(m.display().calls.last(), Some(&Call::Suggestions(Vec::new())));
        assert!(!m.guard.is_held());
    }

    #[test]
    fn test_commit_suffix_law() {
        let batch = hel_batch();
        for i in 0..batch.len() {
            let mut m = machine();
            m.on_batch(batch.clone());
            for _ in 0..i {
                m.on_navigate(Direction::Next);
            }
            let selected = m.highlighted().unwrap().to_string();
            let CommitOutcome::Committed { suffix } = m.on_commit().unwrap() else {
                panic!("expected commit");
            };
            assert_eq!(format!("{}{suffix}", batch.queried_word), selected);
        }
    }

    #[test]
    fn test_commit_when_idle_is_noop() {
        let mut m = machine();
        assert_eq!(m.on_commit().unwrap(), CommitOutcome::NothingToCommit);
        assert!(m.injector().typed.is_empty());
    }

    #[test]
    fn test_commit_while_guard_held_is_busy() {
        let mut m = machine();
        m.on_batch(hel_batch());
        let _held = m.guard.clone().try_acquire().unwrap();

        assert_eq!(m.on_commit().unwrap(), CommitOutcome::Busy);
        assert!(m.injector().typed.is_empty());
        assert_eq!(m.highlighted(), Some("hello"));
    }

    #[test]
    fn test_failed_injection_keeps_batch() {
        let mut m = machine();
        m.injector.fail = true;
        m.on_batch(hel_batch());

        assert!(m.on_commit().is_err());
        assert_eq!(m.highlighted(), Some("hello"));
        assert!(!m.guard.is_held());
    }

    #[test]
    fn test_control_stops_everything() {
        for displaying in [false, true] {
            let mut m = machine();
            if displaying {
                m.on_batch(hel_batch());
            }
            let calls_before = m.display().calls.len();

            m.on_control();
            assert!(m.is_stopped());

            m.on_batch(hel_batch());
            m.on_navigate(Direction::Next);
            assert_eq!(m.on_commit().unwrap(), CommitOutcome::Stopped);

            assert_eq!(m.display().calls.len(), calls_before);
            assert!(m.injector().typed.is_empty());
            assert!(m.is_stopped());
        }
    }

    #[test]
    fn test_commit_suffix_handles_case_mismatch() {
        assert_eq!(commit_suffix("hel", "help"), "p");
        assert_eq!(commit_suffix("Hel", "help"), "p");
        assert_eq!(commit_suffix("help", "help"), "");
        assert_eq!(commit_suffix("caf", "café"), "é");
        assert_eq!(commit_suffix("helps", "help"), "");
    }
}
