//! Duration input fields.
//!
//! The user types whole seconds. A value that is not a positive whole number
//! is refused and the field goes back to the last value it accepted.

use crate::error::InputError;

/// One editable duration, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationField {
    last_valid_secs: u64,
    text: String,
}

impl DurationField {
    pub fn new(secs: u64) -> Self {
        Self {
            last_valid_secs: secs,
            text: secs.to_string(),
        }
    }

    /// What the field currently shows.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn secs(&self) -> u64 {
        self.last_valid_secs
    }

    pub fn millis(&self) -> u64 {
        self.last_valid_secs.saturating_mul(1000)
    }

    /// Parse `raw` without touching the field.
    ///
    /// # Errors
    ///
    /// `InputError::NotANumber` if `raw` is not an integer,
    /// `InputError::NonPositive` if it is zero or negative.
    pub fn parse(raw: &str) -> Result<u64, InputError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
        if value <= 0 {
            return Err(InputError::NonPositive);
        }
        Ok(value as u64)
    }

    /// Accept `raw` as the new value, or revert the field and return why not.
    ///
    /// # Errors
    ///
    /// See [`DurationField::parse`].
    pub fn submit(&mut self, raw: &str) -> Result<u64, InputError> {
        match Self::parse(raw) {
            Ok(secs) => {
                self.last_valid_secs = secs;
                self.text = secs.to_string();
                Ok(secs)
            }
            Err(e) => {
                self.revert();
                Err(e)
            }
        }
    }

    /// Show the last accepted value again.
    pub fn revert(&mut self) {
        self.text = self.last_valid_secs.to_string();
    }
}
