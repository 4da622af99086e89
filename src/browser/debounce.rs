//! Debouncer: Cancellable Single-Slot Timer
//!
//! The host owns the clock. `schedule` arms the timer with a value and a
//! deadline, cancelling whatever was pending; `poll` hands the value over once
//! the deadline has passed. At most one value is ever pending, so a
//! superseded input is dropped without ever reaching the search engine.

// =============================================================================
// Types
// =============================================================================

/// Cancellation handle for one scheduled value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline_ms: f64,
    handle: TimerHandle,
}

// =============================================================================
// Debouncer
// =============================================================================

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: f64,
    pending: Option<Pending<T>>,
    next_handle: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            pending: None,
            next_handle: 0,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Arm the timer for `value`, cancelling the previously pending one
    pub fn schedule(&mut self, value: T, now_ms: f64) -> TimerHandle {
        if let Some(previous) = self.pending.take() {
            tracing::trace!(handle = previous.handle.0, "debounce timer superseded");
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(Pending {
            value,
            deadline_ms: now_ms + self.delay_ms,
            handle,
        });
        handle
    }

    /// Cancel a scheduled value. Stale handles are ignored.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let armed = self.pending.as_ref().map(|p| p.handle) == Some(handle);
        if armed {
            self.pending = None;
            tracing::trace!(handle = handle.0, "debounce timer cancelled");
        }
        armed
    }

    /// Take the pending value if its deadline has been reached
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        let due = self.next_deadline().map_or(false, |deadline| now_ms >= deadline);
        if due {
            self.flush()
        } else {
            None
        }
    }

    /// Fire immediately, regardless of the deadline
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================
