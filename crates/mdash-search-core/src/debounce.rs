//! Cancellable delayed task for coalescing keystrokes.
//!
//! Each [`schedule`](Debouncer::schedule) replaces the pending value and pushes
//! the deadline out by the window, so only the last value scheduled before a
//! quiet period fires. Timestamps are caller-supplied milliseconds (for
//! example `performance.now()` in a browser, or elapsed time since a session
//! started on a native runtime).
//!
//! ```rust
//! use mdash_search_core::debounce::Debouncer;
//!
//! let mut d = Debouncer::new(150);
//! d.schedule("i", 0);
//! d.schedule("in", 60);
//! d.schedule("ins", 120);
//! assert_eq!(d.fire_due(200), None);
//! assert_eq!(d.fire_due(270), Some("ins"));
//! assert_eq!(d.fire_due(500), None);
//! ```

/// Default quiet period before a pending query runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<V> {
    value: V,
    deadline_ms: u64,
}

/// Holds at most one pending value and its deadline.
#[derive(Debug, Clone)]
pub struct Debouncer<V> {
    window_ms: u64,
    pending: Option<Pending<V>>,
}

impl<V> Debouncer<V> {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Replace any pending value and reset the deadline to `now_ms + window`.
    pub fn schedule(&mut self, value: V, now_ms: u64) {
        self.pending = Some(Pending {
            value,
            deadline_ms: now_ms.saturating_add(self.window_ms),
        });
    }

    /// Deadline of the pending value, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its deadline has passed.
    pub fn fire_due(&mut self, now_ms: u64) -> Option<V> {
        if self.deadline().is_some_and(|d| now_ms >= d) {
            self.flush()
        } else {
            None
        }
    }

    /// Take the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<V> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value without running it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<V> Default for Debouncer<V> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
