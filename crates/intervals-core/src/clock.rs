//! Monotonic time sources.
//!
//! The timer never reads wall-clock time for its arithmetic. Every reading is
//! a millisecond offset from an arbitrary origin fixed when the clock is built,
//! so readings only ever grow.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic clock abstraction used by the timer engine.
pub trait Clock {
    /// Milliseconds since this clock's origin.
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `epoch_ms`, saturating at 0 on underflow.
    fn ms_since(&self, epoch_ms: u64) -> u64 {
        self.now_ms().saturating_sub(epoch_ms)
    }
}

/// Real-time clock backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock backed by `tokio::time::Instant`.
///
/// Follows the runtime's notion of time, so a paused test runtime
/// (`start_paused = true`) advances it together with `tokio::time::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Deterministic clock whose time only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the timer.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Set the absolute reading. Readings must not go backwards.
    pub fn set(&self, ms: u64) {
        self.now.fetch_max(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
