use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wall-clock instant recorded by the serial logger (no zone information)
pub type Timestamp = NaiveDateTime;

/// One tokenized log line.
///
/// Records are produced by a tokenizer and consumed exactly once by an
/// analysis session. Timestamps are expected to be non-decreasing within
/// one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: Timestamp,
    /// Log level as printed by the firmware (e.g. "INFO", "ERR")
    pub level: String,
    /// Emitting firmware module (e.g. "trust-comm", "keystore")
    pub module: String,
    /// Free-text message after the module prefix
    pub message: String,
}

impl Record {
    pub fn new(
        timestamp: Timestamp,
        level: impl Into<String>,
        module: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level: level.into(),
            module: module.into(),
            message: message.into(),
        }
    }
}
