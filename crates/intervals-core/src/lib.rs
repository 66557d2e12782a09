//! # Intervals Core Library
//!
//! This library provides the core logic of the intervals widget: a timer
//! that alternates work and rest phases, shows a circular progress indicator
//! and cues phase changes with a tone and a vibration. Hosts (the terminal
//! binary in this workspace, or any other front end) supply the display,
//! audio and haptic adapters.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a monotonic-clock-based state machine that the caller
//!   polls once per frame. It owns all timing arithmetic.
//! - **Countdown**: a cancellable 3-2-1 sequence that precedes a fresh start.
//! - **Driver**: the per-frame procedure (detect completion, switch, notify,
//!   render) and the redraw loop.
//! - **Configuration**: read-only TOML settings.
//!
//! ## Key Components
//!
//! - [`IntervalTimer`]: Core timer state machine
//! - [`WidgetDriver`]: Render/notification driver
//! - [`WidgetConfig`]: Widget configuration
//! - [`Display`], [`Audio`], [`Haptics`]: Collaborator traits

pub mod adapters;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod input;
pub mod timer;

pub use adapters::{Audio, Display, Frame, Haptics};
pub use clock::{Clock, ManualClock, MonotonicClock, TokioClock};
pub use config::{CountdownCue, WidgetConfig};
pub use driver::{FrameReport, WidgetDriver};
pub use error::{AdapterError, ConfigError, CoreError, InputError};
pub use events::Event;
pub use input::DurationField;
pub use timer::{
    CountdownHandle, CountdownOutcome, DisplayTime, IntervalTimer, Phase, TimerState, TimerStatus,
};
