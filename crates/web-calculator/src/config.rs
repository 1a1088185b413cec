//! Calculator configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest rounding precision that still fits in an `f64` mantissa
pub const MAX_ROUND_DECIMALS: u32 = 15;

/// Errors raised while loading or validating a [`CalculatorConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Input was not valid JSON for the config schema
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Rounding precision out of range
    #[error("round_decimals must be at most {MAX_ROUND_DECIMALS}, got {0}")]
    RoundDecimals(u32),
    /// A delay of zero would fire before the user sees anything
    #[error("{0} must be greater than zero")]
    ZeroDelay(&'static str),
    /// Separator would be confused with operand text
    #[error("thousands_separator {0:?} collides with operand characters")]
    Separator(char),
}

/// Tunables for the state machine and its display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// How long the error text stays before the calculator clears itself
    pub recovery_delay_ms: u64,
    /// How long the result flash cue stays on the display
    pub flash_duration_ms: u64,
    /// Decimal places results are rounded to
    pub round_decimals: u32,
    /// Character placed between groups of three integer digits
    pub thousands_separator: char,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            recovery_delay_ms: 2000,
            flash_duration_ms: 200,
            round_decimals: 10,
            thousands_separator: ',',
        }
    }
}

impl CalculatorConfig {
    /// Creates the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates a configuration from JSON; missing fields use defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the JSON is malformed or a value is out of range
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_decimals > MAX_ROUND_DECIMALS {
            return Err(ConfigError::RoundDecimals(self.round_decimals));
        }
        if self.recovery_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay("recovery_delay_ms"));
        }
        if self.flash_duration_ms == 0 {
            return Err(ConfigError::ZeroDelay("flash_duration_ms"));
        }
        let sep = self.thousands_separator;
        if sep.is_ascii_digit() || matches!(sep, '.' | '-' | '+') {
            return Err(ConfigError::Separator(sep));
        }
        Ok(())
    }

    /// Sets the error recovery delay
    #[must_use]
    pub const fn with_recovery_delay_ms(mut self, ms: u64) -> Self {
        self.recovery_delay_ms = ms;
        self
    }

    /// Sets the flash duration
    #[must_use]
    pub const fn with_flash_duration_ms(mut self, ms: u64) -> Self {
        self.flash_duration_ms = ms;
        self
    }

    /// Sets how many decimal places results are rounded to
    #[must_use]
    pub const fn with_round_decimals(mut self, decimals: u32) -> Self {
        self.round_decimals = decimals;
        self
    }

    /// Sets the thousands separator
    #[must_use]
    pub const fn with_thousands_separator(mut self, separator: char) -> Self {
        self.thousands_separator = separator;
        self
    }

    /// Error recovery delay as a [`Duration`]
    #[must_use]
    pub const fn recovery_delay(&self) -> Duration {
        Duration::from_millis(self.recovery_delay_ms)
    }

    /// Flash duration as a [`Duration`]
    #[must_use]
    pub const fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }
}
