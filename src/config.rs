//! System configuration parameters
//!
//! Every threshold, timeout, and buffer-related value is a compile-time
//! constant.  [`BoilerConfig::default()`] is assembled from those constants;
//! tests and bench setups build variants of it.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::protocol::{MAX_FRAME_LEN, NAME_LEN};

/// Sentinel content of LastGoodSentence, and the expected message name.
pub const DEFAULT_SENTENCE_NAME: &str = "SHBCC";
/// Comma-delimited field (0 = message name) carrying `ON` / `OFF`.
pub const DEFAULT_COMMAND_FIELD: u8 = 1;

/// Dead-man window: relay is forced ON if no OFF refresh arrives in time.
pub const DEFAULT_DEADLINE_TIMEOUT_MS: u32 = 15 * 60 * 1000;

pub const DEFAULT_COMM_BLINK_MS: u32 = 1000;
pub const DEFAULT_ERROR_BLINK_MS: u32 = 500;
pub const DEFAULT_POST_BLINK_MS: u32 = 500;

/// Emergency threshold in 1/100 °C.
pub const DEFAULT_CRITICAL_TEMP_CENTI: i32 = 2500;
/// Hysteresis margin in 1/100 °C.
pub const DEFAULT_HYSTERESIS_CENTI: i32 = 200;

pub const DEFAULT_RF_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TELEMETRY_INTERVAL_SECS: u32 = 60;
pub const DEFAULT_WATCHDOG_TIMEOUT_MS: u32 = 10_000;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoilerConfig {
    // --- Protocol ---
    /// Expected sentence name; also the "empty" LastGoodSentence sentinel.
    pub sentence_name: String<MAX_FRAME_LEN>,
    /// Index of the command field inside the sentence.
    pub command_field: u8,

    // --- Fail-safe ---
    /// Dead-man window after an OFF command (milliseconds).
    pub deadline_timeout_ms: u32,

    // --- Status LEDs ---
    /// Activity (blue) blink per received frame (milliseconds).
    pub comm_blink_ms: u32,
    /// Error (red) blink per rejected sentence (milliseconds).
    pub error_blink_ms: u32,
    /// Power-on self-test blink (milliseconds).
    pub post_blink_ms: u32,

    // --- Thermal override ---
    /// Below this temperature the relay is forced ON (1/100 °C).
    pub critical_temp_centi: i32,
    /// Temperature must climb this far above `critical_temp_centi` before
    /// the override releases (1/100 °C).
    pub hysteresis_centi: i32,

    // --- Firmware loop ---
    /// RF UART baud rate.
    pub rf_baud_rate: u32,
    /// Telemetry log interval (seconds).
    pub telemetry_interval_secs: u32,
    /// Task watchdog timeout (milliseconds).
    pub watchdog_timeout_ms: u32,
}

impl Default for BoilerConfig {
    fn default() -> Self {
        let mut sentence_name = String::new();
        // Compile-time constant, always fits.
        let _ = sentence_name.push_str(DEFAULT_SENTENCE_NAME);

        Self {
            sentence_name,
            command_field: DEFAULT_COMMAND_FIELD,

            deadline_timeout_ms: DEFAULT_DEADLINE_TIMEOUT_MS,

            comm_blink_ms: DEFAULT_COMM_BLINK_MS,
            error_blink_ms: DEFAULT_ERROR_BLINK_MS,
            post_blink_ms: DEFAULT_POST_BLINK_MS,

            critical_temp_centi: DEFAULT_CRITICAL_TEMP_CENTI,
            hysteresis_centi: DEFAULT_HYSTERESIS_CENTI,

            rf_baud_rate: DEFAULT_RF_BAUD_RATE,
            telemetry_interval_secs: DEFAULT_TELEMETRY_INTERVAL_SECS,
            watchdog_timeout_ms: DEFAULT_WATCHDOG_TIMEOUT_MS,
        }
    }
}

impl BoilerConfig {
    /// Default configuration listening for a different sentence name.
    pub fn with_sentence_name(name: &str) -> Result<Self, ConfigError> {
        let mut sentence_name = String::new();
        sentence_name
            .push_str(name)
            .map_err(|_| ConfigError::ValidationFailed("sentence_name longer than a frame"))?;
        let config = Self {
            sentence_name,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the receive path or the fail-safe.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sentence_name.len() < NAME_LEN {
            return Err(ConfigError::ValidationFailed(
                "sentence_name shorter than the message name prefix",
            ));
        }
        if self
            .sentence_name
            .bytes()
            .any(|b| !b.is_ascii_graphic() || b == b',' || b == b'*' || b == b'$')
        {
            return Err(ConfigError::ValidationFailed(
                "sentence_name contains a delimiter or non-printable byte",
            ));
        }
        if self.command_field == 0 {
            return Err(ConfigError::ValidationFailed(
                "command_field 0 is the message name",
            ));
        }
        if self.deadline_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("deadline_timeout_ms is zero"));
        }
        if self.comm_blink_ms == 0 || self.error_blink_ms == 0 || self.post_blink_ms == 0 {
            return Err(ConfigError::ValidationFailed("blink duration is zero"));
        }
        if self.hysteresis_centi <= 0 {
            return Err(ConfigError::ValidationFailed(
                "hysteresis_centi must be positive",
            ));
        }
        if self.critical_temp_centi.checked_add(self.hysteresis_centi).is_none() {
            return Err(ConfigError::ValidationFailed("hysteresis band overflows"));
        }
        if self.rf_baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("rf_baud_rate is zero"));
        }
        if self.watchdog_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("watchdog_timeout_ms is zero"));
        }
        Ok(())
    }
}
