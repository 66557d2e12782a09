//! Terminal adapters: a one-line status display, the terminal bell as audio,
//! and haptics that always report the missing motor.

use std::io::{IsTerminal, Write};

use intervals_core::config::HapticConfig;
use intervals_core::{AdapterError, Audio, CountdownCue, Display, Frame, Haptics, WidgetConfig};

const BAR_WIDTH: usize = 20;

/// Status line on stdout. Redraws in place on a terminal; otherwise prints a
/// new line whenever the shown text changes.
pub struct TerminalDisplay {
    interactive: bool,
    last_line: String,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdout().is_terminal(),
            last_line: String::new(),
        }
    }

    fn write_line(&mut self, line: String) -> Result<(), AdapterError> {
        if line == self.last_line {
            return Ok(());
        }
        let mut out = std::io::stdout().lock();
        let result = if self.interactive {
            write!(out, "\r\x1b[2K{line}").and_then(|_| out.flush())
        } else {
            writeln!(out, "{line}")
        };
        self.last_line = line;
        result.map_err(|e| AdapterError::Device(e.to_string()))
    }
}

impl Display for TerminalDisplay {
    fn render(&mut self, frame: &Frame) -> Result<(), AdapterError> {
        self.write_line(status_line(frame))
    }

    fn show_countdown(&mut self, value: u8) -> Result<(), AdapterError> {
        self.write_line(format!("Get ready... {value}"))
    }
}

/// `Work 00:12 [########............]  40%  sets 2`
pub fn status_line(frame: &Frame) -> String {
    let filled = ((frame.progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "{:<4} {} [{}{}] {:>3}%  sets {}",
        frame.phase.label(),
        frame.remaining_text,
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        (frame.progress * 100.0).round() as u32,
        frame.phase_count,
    )
}

/// Rings the terminal bell. The bell has no pitch, so frequencies are only logged.
pub struct TerminalBell {
    cues: Vec<CountdownCue>,
}

impl TerminalBell {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            cues: config.countdown_cues.clone(),
        }
    }
}

impl Audio for TerminalBell {
    fn play_tone(&mut self, frequency_hz: u32) -> Result<(), AdapterError> {
        let mut out = std::io::stdout();
        if !out.is_terminal() {
            return Err(AdapterError::Unsupported {
                capability: "audio",
            });
        }
        tracing::trace!(frequency_hz, "bell");
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| AdapterError::Device(e.to_string()))
    }

    fn play_countdown_tone(&mut self, value: u8) -> Result<(), AdapterError> {
        match CountdownCue::find(&self.cues, value) {
            Some(cue) => self.play_tone(cue.frequency_hz),
            // No cue configured for this tick: stay silent.
            None => Ok(()),
        }
    }
}

/// Terminals cannot vibrate; every request reports `Unsupported` after
/// working out the pattern that would have been played.
pub struct TerminalHaptics {
    phase_vibration_ms: u64,
    cues: Vec<CountdownCue>,
}

impl TerminalHaptics {
    pub fn new(haptics: &HapticConfig, cues: &[CountdownCue]) -> Self {
        Self {
            phase_vibration_ms: haptics.phase_vibration_ms,
            cues: cues.to_vec(),
        }
    }
}

impl Haptics for TerminalHaptics {
    fn vibrate(&mut self, pattern: &[u64]) -> Result<(), AdapterError> {
        tracing::trace!(?pattern, "vibration requested");
        Err(AdapterError::Unsupported {
            capability: "vibration",
        })
    }

    fn vibrate_phase_change(&mut self) -> Result<(), AdapterError> {
        let ms = self.phase_vibration_ms;
        self.vibrate(&[ms])
    }

    fn vibrate_countdown(&mut self, value: u8) -> Result<(), AdapterError> {
        match CountdownCue::find(&self.cues, value) {
            Some(cue) => self.vibrate(&[cue.vibration_ms]),
            None => Ok(()),
        }
    }
}
