use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{CountdownOutcome, Phase, TimerStatus};

/// Every state change in the widget produces an Event.
/// Transitions return them; the driver forwards them to an optional observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        countdown_id: u64,
        at: DateTime<Utc>,
    },
    CountdownTick {
        countdown_id: u64,
        value: u8,
        at: DateTime<Utc>,
    },
    CountdownFinished {
        countdown_id: u64,
        outcome: CountdownOutcome,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        elapsed_ms: u64,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    PhaseSwitched {
        from: Phase,
        to: Phase,
        duration_ms: u64,
        phase_count: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    MuteToggled {
        muted: bool,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        work_ms: u64,
        rest_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        phase: Phase,
        elapsed_ms: u64,
        remaining_ms: u64,
        total_ms: u64,
        progress: f64,
        phase_count: u32,
        muted: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::CountdownStarted { .. } => "countdown_started",
            Event::CountdownTick { .. } => "countdown_tick",
            Event::CountdownFinished { .. } => "countdown_finished",
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::PhaseSwitched { .. } => "phase_switched",
            Event::TimerReset { .. } => "timer_reset",
            Event::MuteToggled { .. } => "mute_toggled",
            Event::DurationsChanged { .. } => "durations_changed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::MuteToggled {
            muted: true,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MuteToggled");
        assert_eq!(json["muted"], true);
        assert_eq!(event.kind(), "mute_toggled");
    }
}
