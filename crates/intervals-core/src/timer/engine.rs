//! Interval timer engine.
//!
//! The engine is a monotonic-clock-based state machine. It does not use
//! internal threads or timers - the caller polls it (usually once per display
//! frame) and calls `switch_phase()` when a phase has run out.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Countdown -> Running <-> Paused
//!   ^________________________________|   (reset, from anywhere)
//! ```
//!
//! `Running` loops on itself through `switch_phase()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = IntervalTimer::new(MonotonicClock::new(), 30_000, 10_000);
//! timer.start();
//! // Once per frame:
//! let elapsed = timer.elapsed_ms();
//! if timer.is_phase_complete(elapsed) {
//!     timer.switch_phase();
//! }
//! ```
//!
//! Commands return `Some(Event)` when they changed the state and `None` when
//! the command does not apply in the current status.

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::countdown::{CountdownHandle, CountdownOutcome};
use super::display::DisplayTime;
use super::state::{Phase, TimerState, TimerStatus};
use crate::clock::{Clock, MonotonicClock};
use crate::error::InputError;
use crate::events::Event;

/// Core interval timer.
///
/// Operates on monotonic clock deltas -- no internal thread.
#[derive(Debug)]
pub struct IntervalTimer<C: Clock = MonotonicClock> {
    clock: C,
    state: TimerState,
    /// Present while a countdown is in flight.
    countdown: Option<CountdownHandle>,
    /// Id of a countdown that completed and is waiting for `start()`.
    completed_countdown: Option<u64>,
    next_countdown_id: u64,
    /// Token of the redraw loop scheduled for the current run.
    redraw: Option<CancellationToken>,
}

impl<C: Clock> IntervalTimer<C> {
    /// Create an idle timer in the work phase.
    pub fn new(clock: C, work_duration_ms: u64, rest_duration_ms: u64) -> Self {
        Self {
            clock,
            state: TimerState::new(work_duration_ms, rest_duration_ms),
            countdown: None,
            completed_countdown: None,
            next_countdown_id: 1,
            redraw: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_work_phase(&self) -> bool {
        self.state.is_work_phase()
    }

    pub fn total_time_ms(&self) -> u64 {
        self.state.total_time_ms
    }

    pub fn paused_elapsed_ms(&self) -> u64 {
        self.state.paused_elapsed_ms
    }

    pub fn phase_count(&self) -> u32 {
        self.state.phase_count
    }

    pub fn is_muted(&self) -> bool {
        self.state.is_muted
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether a countdown is still delivering ticks.
    pub fn countdown_in_flight(&self) -> bool {
        self.countdown.is_some()
    }

    /// Elapsed time in the current phase.
    ///
    /// Live while running; outside of `Running` this is the value captured
    /// at the last pause (0 when idle).
    pub fn elapsed_ms(&self) -> u64 {
        match self.state.status {
            TimerStatus::Running => self.clock.ms_since(self.state.phase_start_ms),
            _ => self.state.paused_elapsed_ms,
        }
    }

    pub fn is_phase_complete(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.state.total_time_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.display_time().remaining_ms
    }

    /// Display values for the current instant.
    pub fn display_time(&self) -> DisplayTime {
        DisplayTime::derive(self.elapsed_ms(), self.state.total_time_ms)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let display = self.display_time();
        Event::StateSnapshot {
            status: self.state.status,
            phase: self.state.phase,
            elapsed_ms: self.elapsed_ms(),
            remaining_ms: display.remaining_ms,
            total_ms: self.state.total_time_ms,
            progress: display.progress,
            phase_count: self.state.phase_count,
            muted: self.state.is_muted,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh run or resume a paused one.
    ///
    /// A fresh start is accepted from `Idle`, or from `Countdown` once the
    /// countdown has completed. While a countdown is still in flight this is
    /// a no-op: cancel it or let it finish first.
    pub fn start(&mut self) -> Option<Event> {
        match self.state.status {
            TimerStatus::Idle => Some(self.begin_phase_run()),
            TimerStatus::Countdown if self.countdown.is_none() => Some(self.begin_phase_run()),
            TimerStatus::Countdown => None,
            TimerStatus::Paused => {
                let now = self.clock.now_ms();
                self.state.phase_start_ms = now.saturating_sub(self.state.paused_elapsed_ms);
                self.state.status = TimerStatus::Running;
                Some(Event::TimerResumed {
                    phase: self.state.phase,
                    elapsed_ms: self.state.paused_elapsed_ms,
                    at: Utc::now(),
                })
            }
            TimerStatus::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state.status {
            TimerStatus::Running => {
                let elapsed = self
                    .clock
                    .ms_since(self.state.phase_start_ms)
                    .min(self.state.total_time_ms);
                self.state.paused_elapsed_ms = elapsed;
                self.state.status = TimerStatus::Paused;
                self.cancel_redraw();
                Some(Event::TimerPaused {
                    phase: self.state.phase,
                    elapsed_ms: elapsed,
                    remaining_ms: self.state.total_time_ms - elapsed,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Return to the initial idle state from anywhere.
    pub fn reset(&mut self) -> Option<Event> {
        if let Some(handle) = self.countdown.take() {
            handle.cancel();
        }
        self.completed_countdown = None;
        self.cancel_redraw();
        self.state.rewind();
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Move to the other phase. Only meaningful while running.
    ///
    /// `phase_count` goes up when a work interval ends (on entering rest).
    pub fn switch_phase(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        let from = self.state.phase;
        let to = from.next();
        self.state.phase = to;
        self.state.paused_elapsed_ms = 0;
        self.state.phase_start_ms = self.clock.now_ms();
        self.state.total_time_ms = self.state.duration_of(to);
        if to == Phase::Rest {
            self.state.phase_count = self.state.phase_count.saturating_add(1);
        }
        Some(Event::PhaseSwitched {
            from,
            to,
            duration_ms: self.state.total_time_ms,
            phase_count: self.state.phase_count,
            at: Utc::now(),
        })
    }

    pub fn toggle_mute(&mut self) -> Option<Event> {
        self.state.is_muted = !self.state.is_muted;
        Some(Event::MuteToggled {
            muted: self.state.is_muted,
            at: Utc::now(),
        })
    }

    /// Replace the configured durations. Only allowed while idle.
    ///
    /// # Errors
    ///
    /// `InputError::NonPositive` for a zero duration and
    /// `InputError::TimerActive` outside of `Idle`. The state is untouched
    /// on error.
    pub fn set_durations(&mut self, work_ms: u64, rest_ms: u64) -> Result<Event, InputError> {
        if self.state.status != TimerStatus::Idle {
            return Err(InputError::TimerActive);
        }
        if work_ms == 0 || rest_ms == 0 {
            return Err(InputError::NonPositive);
        }
        self.state.work_duration_ms = work_ms;
        self.state.rest_duration_ms = rest_ms;
        self.state.total_time_ms = self.state.duration_of(self.state.phase);
        Ok(Event::DurationsChanged {
            work_ms,
            rest_ms,
            at: Utc::now(),
        })
    }

    // ── Countdown ────────────────────────────────────────────────────

    /// Arm a countdown. Only valid from `Idle`.
    ///
    /// The returned handle is what the sequencer waits on; cancelling it (or
    /// calling `cancel_countdown()`) stops the sequence.
    pub fn begin_countdown(&mut self) -> Option<CountdownHandle> {
        if self.state.status != TimerStatus::Idle {
            return None;
        }
        let handle = CountdownHandle::new(self.next_countdown_id);
        self.next_countdown_id = self.next_countdown_id.wrapping_add(1);
        self.state.status = TimerStatus::Countdown;
        self.state.paused_elapsed_ms = 0;
        self.countdown = Some(handle.clone());
        Some(handle)
    }

    /// Whether `handle` is the countdown currently in flight.
    pub fn is_current_countdown(&self, handle: &CountdownHandle) -> bool {
        self.state.status == TimerStatus::Countdown
            && !handle.is_cancelled()
            && self.countdown.as_ref() == Some(handle)
    }

    /// Record the outcome of the sequence started for `handle`.
    ///
    /// Completion clears the handle and leaves the status at `Countdown`
    /// until `start()`. Cancellation returns to `Idle`. Outcomes for stale
    /// handles are ignored.
    pub fn finish_countdown(
        &mut self,
        handle: &CountdownHandle,
        outcome: CountdownOutcome,
    ) -> Option<Event> {
        if self.state.status != TimerStatus::Countdown || self.countdown.as_ref() != Some(handle) {
            return None;
        }
        match outcome {
            CountdownOutcome::Completed if !handle.is_cancelled() => {
                self.countdown = None;
                self.completed_countdown = Some(handle.id());
            }
            _ => {
                handle.cancel();
                self.countdown = None;
                self.state.status = TimerStatus::Idle;
            }
        }
        Some(Event::CountdownFinished {
            countdown_id: handle.id(),
            outcome: if self.state.status == TimerStatus::Idle {
                CountdownOutcome::Cancelled
            } else {
                CountdownOutcome::Completed
            },
            at: Utc::now(),
        })
    }

    /// Abort the countdown and go back to `Idle`. No-op outside `Countdown`.
    pub fn cancel_countdown(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Countdown {
            return None;
        }
        let countdown_id = match self.countdown.take() {
            Some(handle) => {
                handle.cancel();
                handle.id()
            }
            // Already completed, waiting for start().
            None => self.completed_countdown.take().unwrap_or_default(),
        };
        self.state.status = TimerStatus::Idle;
        Some(Event::CountdownFinished {
            countdown_id,
            outcome: CountdownOutcome::Cancelled,
            at: Utc::now(),
        })
    }

    // ── Redraw scheduling ────────────────────────────────────────────

    /// Token for a redraw loop bound to the current run.
    ///
    /// Any previously armed loop is cancelled. Returns `None` unless running.
    pub fn arm_redraw(&mut self) -> Option<CancellationToken> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        self.cancel_redraw();
        let token = CancellationToken::new();
        self.redraw = Some(token.clone());
        Some(token)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_phase_run(&mut self) -> Event {
        self.countdown = None;
        self.completed_countdown = None;
        self.state.paused_elapsed_ms = 0;
        self.state.total_time_ms = self.state.duration_of(self.state.phase);
        self.state.phase_start_ms = self.clock.now_ms();
        self.state.status = TimerStatus::Running;
        Event::TimerStarted {
            phase: self.state.phase,
            duration_ms: self.state.total_time_ms,
            at: Utc::now(),
        }
    }

    fn cancel_redraw(&mut self) {
        if let Some(token) = self.redraw.take() {
            token.cancel();
        }
    }
}
