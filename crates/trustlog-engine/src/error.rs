use serde::Serialize;
use std::fmt;
use trustlog_types::Timestamp;

/// Result type for trustlog-engine operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Faults raised while interpreting a single record.
///
/// Unrecognized modules and unrecognized messages are not errors; they are
/// ignored by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisError {
    /// The message has a recognized prefix but its fields could not be extracted
    UnparsableShape {
        module: String,
        message: String,
        reason: String,
    },

    /// An outcome or "sent" record refers to correlation state that does not exist
    CorrelationMissing { module: String, correlation: String },

    /// The outcome line names a different peer than the tracked request
    AddressMismatch {
        mid: u32,
        tracked: String,
        observed: String,
    },

    /// A "generated" record arrived while an earlier one is still pending
    DuplicatePending { module: String },

    /// A "received" record reuses a mid that is still tracked
    DuplicateCorrelation {
        mid: u32,
        previous: String,
        current: String,
    },
}

impl AnalysisError {
    pub(crate) fn unparsable(
        module: &str,
        message: &str,
        reason: impl Into<String>,
    ) -> Self {
        AnalysisError::UnparsableShape {
            module: module.to_string(),
            message: message.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors that stem from broken request/outcome pairing
    pub fn is_correlation_fault(&self) -> bool {
        matches!(
            self,
            AnalysisError::CorrelationMissing { .. } | AnalysisError::DuplicateCorrelation { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::UnparsableShape { .. } => "unparsable_shape",
            AnalysisError::CorrelationMissing { .. } => "correlation_missing",
            AnalysisError::AddressMismatch { .. } => "address_mismatch",
            AnalysisError::DuplicatePending { .. } => "duplicate_pending",
            AnalysisError::DuplicateCorrelation { .. } => "duplicate_correlation",
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::UnparsableShape {
                module,
                message,
                reason,
            } => write!(f, "[{}] failed to parse '{}': {}", module, message, reason),
            AnalysisError::CorrelationMissing {
                module,
                correlation,
            } => write!(f, "[{}] no pending {}", module, correlation),
            AnalysisError::AddressMismatch {
                mid,
                tracked,
                observed,
            } => write!(
                f,
                "mid={} was received from {} but resolved for {}",
                mid, tracked, observed
            ),
            AnalysisError::DuplicatePending { module } => {
                write!(f, "[{}] message generated while another is pending", module)
            }
            AnalysisError::DuplicateCorrelation {
                mid,
                previous,
                current,
            } => write!(
                f,
                "mid={} received from {} while still pending for {}",
                mid, current, previous
            ),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// A recoverable error, kept so callers can report it after the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub time: Timestamp,
    pub module: String,
    pub error: AnalysisError,
}
