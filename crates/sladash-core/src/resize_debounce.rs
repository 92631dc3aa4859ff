#![forbid(unsafe_code)]

//! Trailing-edge resize debouncing on a host-driven clock.
//!
//! # Invariants
//!
//! - **Latest-wins**: only the final width in a burst is applied.
//! - **Trailing edge**: every new resize pushes the deadline out by `delay`.
//! - **Deterministic**: identical `(width, now)` sequences yield identical
//!   decisions; time is supplied by the caller, never read from a clock.
//!
//! A zero delay disables debouncing: every resize applies immediately.

use std::time::Duration;

/// What the caller should do after feeding the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAction {
    /// Nothing to apply yet.
    None,
    /// Apply this width now.
    Apply { width: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    width: u32,
    deadline: Duration,
}

/// Coalesces bursts of resize events into one trailing apply.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl ResizeDebouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a resize observed at `now`.
    pub fn handle_resize(&mut self, width: u32, now: Duration) -> ResizeAction {
        if self.delay.is_zero() {
            self.pending = None;
            return ResizeAction::Apply { width };
        }
        self.pending = Some(Pending {
            width,
            deadline: now.saturating_add(self.delay),
        });
        ResizeAction::None
    }

    /// Apply the pending width once its deadline has passed.
    pub fn tick(&mut self, now: Duration) -> ResizeAction {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                ResizeAction::Apply { width: p.width }
            }
            _ => ResizeAction::None,
        }
    }

    /// Apply the pending width now, ahead of its deadline.
    pub fn flush(&mut self) -> ResizeAction {
        match self.pending.take() {
            Some(p) => ResizeAction::Apply { width: p.width },
            None => ResizeAction::None,
        }
    }

    /// When the host should next call [`tick`](Self::tick).
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.deadline)
    }
}
