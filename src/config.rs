//! Channel configuration parameters
//!
//! Set by the external configuration loader at startup. Values arrive as
//! JSON from the config file or as postcard bytes from persistent storage.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound accepted for `report_interval_ms` (one report per minute).
pub const MAX_REPORT_INTERVAL_MS: u32 = 60_000;

/// Severity threshold for messages printed on a channel.
///
/// Ordered: a channel at `Info` prints `Error`, `Warning` and `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageLevel {
    None,
    Error,
    Warning,
    Info,
    Debug,
    Verbose,
}

/// Per-channel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    // --- Auto-report ---
    /// Auto-report period in milliseconds; 0 disables, nonzero is clamped to >= 50
    pub report_interval_ms: u32,

    // --- Acknowledgements ---
    /// Print `error:<text>` instead of `error:<code>`
    pub verbose_errors: bool,
    /// Minimum level printed by `print_msg`
    pub message_level: MessageLevel,

    // --- Output ---
    /// Expand bare LF into CR-LF on output
    pub add_cr: bool,

    // --- Device flow control ---
    /// Ack-gate wait budget (one 1 ms iteration per unit)
    pub ack_timeout_ms: u32,

    // --- Realtime ---
    /// Channel-level realtime gate; false passes realtime codes to the line
    pub realtime_enabled: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            report_interval_ms: 0,
            verbose_errors: false,
            message_level: MessageLevel::Info,
            add_cr: false,
            ack_timeout_ms: 2000,
            realtime_enabled: true,
        }
    }
}

impl ChannelConfig {
    /// Reject values the channel cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.ack_timeout_ms == 0 {
            return Err(Error::Config("ack_timeout_ms must be nonzero"));
        }
        if self.report_interval_ms > MAX_REPORT_INTERVAL_MS {
            return Err(Error::Config("report_interval_ms exceeds 60000"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config section.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("malformed channel config"))?;
        config.validate()?;
        Ok(config)
    }

    /// Compact persisted form.
    pub fn to_postcard(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("config encode failed"))
    }

    pub fn from_postcard(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("config bytes corrupted"))?;
        config.validate()?;
        Ok(config)
    }
}
