//! Injection guard: keeps synthetic keystrokes out of word segmentation.
//!
//! The committer takes a permit with [`InjectionGuard::try_acquire`] before
//! typing a completion and drops it afterwards. The capture loop never
//! acquires; it only asks whether an injection is in progress or whether an
//! event was observed inside the last injection window. Events queued by the
//! hook during an injection may reach the capture loop after the permit is
//! gone, which is why the window is kept and not just the flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// No window recorded yet: `start > end`.
const NO_START: u64 = u64::MAX;
const NO_END: u64 = 0;

#[derive(Debug)]
struct GuardState {
    held: AtomicBool,
    origin: Instant,
    /// Nanoseconds since `origin`.
    window_start: AtomicU64,
    window_end: AtomicU64,
}

impl GuardState {
    fn nanos_since_origin(&self, time: Instant) -> Option<u64> {
        time.checked_duration_since(self.origin)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }

    fn now(&self) -> u64 {
        self.nanos_since_origin(Instant::now()).unwrap_or(0)
    }
}

/// Shared handle to the injection flag. Clones refer to the same guard.
#[derive(Debug, Clone)]
pub struct InjectionGuard {
    state: Arc<GuardState>,
}

impl InjectionGuard {
    /// Create a released guard.
    pub fn new() -> Self {
        Self {
            state: Arc::new(GuardState {
                held: AtomicBool::new(false),
                origin: Instant::now(),
                window_start: AtomicU64::new(NO_START),
                window_end: AtomicU64::new(NO_END),
            }),
        }
    }

    /// Try to take the guard without blocking.
    ///
    /// Returns `None` if another injection holds it.
    pub fn try_acquire(&self) -> Option<InjectionPermit> {
        self.state
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        // Open the window before anything can be injected.
        self.state.window_end.store(u64::MAX, Ordering::Release);
        self.state.window_start.store(self.state.now(), Ordering::Release);

        tracing::trace!("injection guard acquired");
        Some(InjectionPermit {
            state: Arc::clone(&self.state),
        })
    }

    /// Check whether an injection is in progress.
    pub fn is_held(&self) -> bool {
        self.state.held.load(Ordering::Acquire)
    }

    /// Check whether `time` falls inside the most recent injection window.
    ///
    /// An open window (guard still held) extends to infinity.
    pub fn covers(&self, time: Instant) -> bool {
        let Some(t) = self.state.nanos_since_origin(time) else {
            return false;
        };
        let start = self.state.window_start.load(Ordering::Acquire);
        let end = self.state.window_end.load(Ordering::Acquire);
        start <= t && t <= end
    }

    /// Check whether an event observed at `time` must be treated as synthetic.
    pub fn suppresses(&self, time: Instant) -> bool {
        self.is_held() || self.covers(time)
    }
}

impl Default for InjectionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that the holder owns the injection guard. Released on drop.
#[derive(Debug)]
pub struct InjectionPermit {
    state: Arc<GuardState>,
}

impl Drop for InjectionPermit {
    fn drop(&mut self) {
        self.state.window_end.store(self.state.now(), Ordering::Release);
        self.state.held.store(false, Ordering::Release);
        tracing::trace!("injection guard released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_try_acquire_is_exclusive() {
        let guard = InjectionGuard::new();
        let other = guard.clone();

        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(other.is_held());
        assert!(other.try_acquire().is_none());

        drop(permit);
        assert!(!guard.is_held());
        assert!(other.try_acquire().is_some());
    }

    #[test]
    fn test_window_covers_events_during_injection() {
        let guard = InjectionGuard::new();
        let before = Instant::now();
        thread::sleep(Duration::from_millis(2));

        let permit = guard.try_acquire().unwrap();
        let during = Instant::now();
        assert!(guard.covers(during));
        drop(permit);

        thread::sleep(Duration::from_millis(2));
        let after = Instant::now();

        assert!(guard.covers(during));
        assert!(!guard.covers(before));
        assert!(!guard.covers(after));
        assert!(!guard.suppresses(after));
    }

    #[test]
    fn test_fresh_guard_covers_nothing() {
        let guard = InjectionGuard::new();
        assert!(!guard.is_held());
        assert!(!guard.covers(Instant::now()));
    }
}
