//! Display-time derivation.
//!
//! Pure functions from `(elapsed, total)` to what the display adapter shows.
//! Nothing here touches timer state.

use serde::{Deserialize, Serialize};

/// What a display adapter needs for one frame's countdown text and arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTime {
    pub remaining_ms: u64,
    /// Whole seconds shown to the user, rounded up.
    pub remaining_secs: u64,
    /// 0.0 .. 1.0 progress within the current phase.
    pub progress: f64,
}

impl DisplayTime {
    pub fn derive(elapsed_ms: u64, total_ms: u64) -> Self {
        let remaining_ms = remaining_ms(elapsed_ms, total_ms);
        Self {
            remaining_ms,
            remaining_secs: remaining_ms.div_ceil(1000),
            progress: progress_ratio(elapsed_ms, total_ms),
        }
    }

    /// `MM:SS` text for the remaining time.
    pub fn text(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }

    /// Sweep of the progress arc in degrees, 0 .. 360.
    pub fn arc_degrees(&self) -> f64 {
        self.progress * 360.0
    }
}

/// Milliseconds left in a phase of `total_ms` after `elapsed_ms`.
pub fn remaining_ms(elapsed_ms: u64, total_ms: u64) -> u64 {
    total_ms.saturating_sub(elapsed_ms.min(total_ms))
}

/// Elapsed fraction of the phase, clamped to `0.0 ..= 1.0`.
///
/// A zero total is treated as 1 ms.
pub fn progress_ratio(elapsed_ms: u64, total_ms: u64) -> f64 {
    let total = total_ms.max(1) as f64;
    (elapsed_ms as f64 / total).clamp(0.0, 1.0)
}

/// Format whole seconds as `MM:SS`. Minutes keep growing past 99.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
