//! Collaborator interfaces for display, sound and vibration.
//!
//! The driver only talks to the outside world through these traits. Hosts
//! supply implementations; a refused request comes back as an
//! [`AdapterError`] that the driver logs and drops.

use crate::error::AdapterError;
use crate::timer::Phase;

/// Everything a display needs to draw one running frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Remaining time as `MM:SS`.
    pub remaining_text: String,
    /// 0.0 .. 1.0 progress within the phase.
    pub progress: f64,
    pub phase: Phase,
    pub phase_count: u32,
}

pub trait Display {
    fn render(&mut self, frame: &Frame) -> Result<(), AdapterError>;
    fn show_countdown(&mut self, value: u8) -> Result<(), AdapterError>;
}

pub trait Audio {
    fn play_tone(&mut self, frequency_hz: u32) -> Result<(), AdapterError>;
    fn play_countdown_tone(&mut self, value: u8) -> Result<(), AdapterError>;
}

pub trait Haptics {
    /// Vibrate following `pattern`: alternating on/off durations in ms.
    fn vibrate(&mut self, pattern: &[u64]) -> Result<(), AdapterError>;
    fn vibrate_phase_change(&mut self) -> Result<(), AdapterError>;
    fn vibrate_countdown(&mut self, value: u8) -> Result<(), AdapterError>;
}
