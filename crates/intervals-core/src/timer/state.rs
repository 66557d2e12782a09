use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    /// The three-tick priming sequence is in flight, or has finished and is
    /// waiting for an explicit `start()`.
    Countdown,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Rest => "Rest",
        }
    }

    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Rest,
            Phase::Rest => Phase::Work,
        }
    }
}

/// The canonical timer state.
///
/// Owned by [`IntervalTimer`](super::IntervalTimer) and only mutated through
/// its transitions. Serializable so hosts can dump it for debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub(crate) status: TimerStatus,
    pub(crate) work_duration_ms: u64,
    pub(crate) rest_duration_ms: u64,
    pub(crate) phase: Phase,
    /// Duration of the current phase.
    pub(crate) total_time_ms: u64,
    /// Clock reading from which elapsed time of the current phase is measured.
    /// Shifted back on resume so elapsed time carries over a pause.
    pub(crate) phase_start_ms: u64,
    pub(crate) paused_elapsed_ms: u64,
    /// Number of completed work intervals (incremented on entering rest).
    pub(crate) phase_count: u32,
    pub(crate) is_muted: bool,
}

impl TimerState {
    /// Fresh idle state. Zero durations are raised to 1 ms so the current
    /// phase always has a positive length.
    pub fn new(work_duration_ms: u64, rest_duration_ms: u64) -> Self {
        let work_duration_ms = work_duration_ms.max(1);
        Self {
            status: TimerStatus::Idle,
            work_duration_ms,
            rest_duration_ms: rest_duration_ms.max(1),
            phase: Phase::Work,
            total_time_ms: work_duration_ms,
            phase_start_ms: 0,
            paused_elapsed_ms: 0,
            phase_count: 0,
            is_muted: false,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_work_phase(&self) -> bool {
        self.phase == Phase::Work
    }

    pub fn work_duration_ms(&self) -> u64 {
        self.work_duration_ms
    }

    pub fn rest_duration_ms(&self) -> u64 {
        self.rest_duration_ms
    }

    pub fn total_time_ms(&self) -> u64 {
        self.total_time_ms
    }

    pub fn paused_elapsed_ms(&self) -> u64 {
        self.paused_elapsed_ms
    }

    pub fn phase_count(&self) -> u32 {
        self.phase_count
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    /// Configured duration of `phase`.
    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_duration_ms,
            Phase::Rest => self.rest_duration_ms,
        }
    }

    /// Put everything except the configured durations and mute flag back to
    /// the values the state had when it was created.
    pub(crate) fn rewind(&mut self) {
        self.status = TimerStatus::Idle;
        self.phase = Phase::Work;
        self.total_time_ms = self.work_duration_ms;
        self.phase_start_ms = 0;
        self.paused_elapsed_ms = 0;
        self.phase_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle_work() {
        let state = TimerState::new(30_000, 10_000);
        assert_eq!(state.status(), TimerStatus::Idle);
        assert!(state.is_work_phase());
        assert_eq!(state.total_time_ms(), 30_000);
        assert_eq!(state.phase_count(), 0);
        assert!(!state.is_muted());
    }

    #[test]
    fn zero_durations_are_raised() {
        let state = TimerState::new(0, 0);
        assert_eq!(state.work_duration_ms(), 1);
        assert_eq!(state.rest_duration_ms(), 1);
        assert_eq!(state.total_time_ms(), 1);
    }

    #[test]
    fn phase_alternates() {
        assert_eq!(Phase::Work.next(), Phase::Rest);
        assert_eq!(Phase::Rest.next(), Phase::Work);
        assert_eq!(Phase::Rest.label(), "Rest");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TimerStatus::Countdown).unwrap();
        assert_eq!(json, "\"countdown\"");
    }
}
