mod countdown;
mod display;
mod engine;
mod state;
mod ticker;

pub use countdown::{
    run_countdown, CountdownHandle, CountdownOutcome, COUNTDOWN_CADENCE, COUNTDOWN_TICKS,
};
pub use display::{format_mm_ss, progress_ratio, remaining_ms, DisplayTime};
pub use engine::IntervalTimer;
pub use state::{Phase, TimerState, TimerStatus};
pub use ticker::{run_periodic, sleep_or_cancel};
