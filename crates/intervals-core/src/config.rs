//! TOML-based widget configuration.
//!
//! Holds the startup values of the widget:
//! - Work and rest durations
//! - Whether a fresh start is preceded by the 3-2-1 countdown
//! - Initial mute state
//! - Redraw and countdown cadence
//! - Tone frequencies and vibration lengths for phase changes and countdown ticks
//!
//! Configuration is read from `--config <path>` or, when present, from
//! `<config dir>/intervals/config.toml`. It is never written back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::timer::Phase;

/// Tone played when a phase starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneConfig {
    #[serde(default = "default_work_hz")]
    pub work_hz: u32,
    #[serde(default = "default_rest_hz")]
    pub rest_hz: u32,
}

impl ToneConfig {
    pub fn hz_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_hz,
            Phase::Rest => self.rest_hz,
        }
    }
}

/// Vibration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HapticConfig {
    #[serde(default = "default_phase_vibration_ms")]
    pub phase_vibration_ms: u64,
}

/// Sound and vibration for one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownCue {
    pub tick: u8,
    pub frequency_hz: u32,
    pub vibration_ms: u64,
}

impl CountdownCue {
    /// Cue configured for `tick`, if any.
    pub fn find(cues: &[CountdownCue], tick: u8) -> Option<CountdownCue> {
        cues.iter().copied().find(|c| c.tick == tick)
    }
}

/// Widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_work_secs")]
    pub work_secs: u64,
    #[serde(default = "default_rest_secs")]
    pub rest_secs: u64,
    /// Precede a fresh start with the 3-2-1 countdown.
    #[serde(default = "default_true")]
    pub countdown_before_start: bool,
    #[serde(default)]
    pub muted: bool,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_countdown_cadence_ms")]
    pub countdown_cadence_ms: u64,
    #[serde(default)]
    pub tones: ToneConfig,
    #[serde(default)]
    pub haptics: HapticConfig,
    #[serde(default = "default_countdown_cues")]
    pub countdown_cues: Vec<CountdownCue>,
}

// Default functions
fn default_work_secs() -> u64 {
    30
}
fn default_rest_secs() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_frame_interval_ms() -> u64 {
    16
}
fn default_countdown_cadence_ms() -> u64 {
    1000
}
fn default_work_hz() -> u32 {
    880
}
fn default_rest_hz() -> u32 {
    440
}
fn default_phase_vibration_ms() -> u64 {
    400
}
fn default_countdown_cues() -> Vec<CountdownCue> {
    vec![
        CountdownCue {
            tick: 3,
            frequency_hz: 440,
            vibration_ms: 100,
        },
        CountdownCue {
            tick: 2,
            frequency_hz: 440,
            vibration_ms: 100,
        },
        CountdownCue {
            tick: 1,
            frequency_hz: 880,
            vibration_ms: 300,
        },
    ]
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            work_hz: default_work_hz(),
            rest_hz: default_rest_hz(),
        }
    }
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self {
            phase_vibration_ms: default_phase_vibration_ms(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            work_secs: default_work_secs(),
            rest_secs: default_rest_secs(),
            countdown_before_start: true,
            muted: false,
            frame_interval_ms: default_frame_interval_ms(),
            countdown_cadence_ms: default_countdown_cadence_ms(),
            tones: ToneConfig::default(),
            haptics: HapticConfig::default(),
            countdown_cues: default_countdown_cues(),
        }
    }
}

impl WidgetConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    /// `<config dir>/intervals/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("intervals").join("config.toml"))
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseFailed` for malformed TOML and
    /// `ConfigError::InvalidValue` when validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: WidgetConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read the config at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Load from `explicit` if given, else from the default location if a
    /// file exists there, else return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a chosen file cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        if self.work_secs == 0 {
            return Err(invalid("work_secs", "must be greater than zero"));
        }
        if self.rest_secs == 0 {
            return Err(invalid("rest_secs", "must be greater than zero"));
        }
        if self.frame_interval_ms == 0 {
            return Err(invalid("frame_interval_ms", "must be greater than zero"));
        }
        if self.countdown_cadence_ms == 0 {
            return Err(invalid("countdown_cadence_ms", "must be greater than zero"));
        }
        if let Some(cue) = self.countdown_cues.iter().find(|c| !(1..=3).contains(&c.tick)) {
            return Err(invalid(
                "countdown_cues",
                &format!("tick {} is outside 1..=3", cue.tick),
            ));
        }
        Ok(())
    }

    pub fn work_ms(&self) -> u64 {
        self.work_secs.saturating_mul(1000)
    }

    pub fn rest_ms(&self) -> u64 {
        self.rest_secs.saturating_mul(1000)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn countdown_cadence(&self) -> Duration {
        Duration::from_millis(self.countdown_cadence_ms)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }
}
