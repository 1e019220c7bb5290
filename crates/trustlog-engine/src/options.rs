use serde::{Deserialize, Serialize};

/// What to do when a record breaks request/outcome pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record a diagnostic and continue with the next record
    #[default]
    Skip,
    /// Stop the session and hand the error to the caller
    Abort,
}

/// What to do when a module generates a second task before sending the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingPolicy {
    /// Replace the pending details with the newer ones
    #[default]
    Overwrite,
    /// Keep the first details and report DuplicatePending
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Applies to CorrelationMissing and DuplicateCorrelation
    pub correlation: ErrorPolicy,
    pub duplicate_pending: PendingPolicy,
}

impl AnalysisOptions {
    pub fn strict() -> Self {
        Self {
            correlation: ErrorPolicy::Abort,
            duplicate_pending: PendingPolicy::Reject,
        }
    }
}
