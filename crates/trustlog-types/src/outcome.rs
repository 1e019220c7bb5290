use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of receiving a peer's disseminated trust information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationReceiveOutcome {
    Success,
    MissingKey,
    OutOfMemory,
    QueueFail,
    VerifyFail,
}

impl ReputationReceiveOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReputationReceiveOutcome::Success => "success",
            ReputationReceiveOutcome::MissingKey => "missing_key",
            ReputationReceiveOutcome::OutOfMemory => "out_of_memory",
            ReputationReceiveOutcome::QueueFail => "queue_fail",
            ReputationReceiveOutcome::VerifyFail => "verify_fail",
        }
    }
}

/// Result of one periodic trust broadcast attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationSendOutcome {
    Success,
    SerializeFail,
    QueueFail,
    SignFail,
    SendFail,
    OutOfMemory,
}

impl ReputationSendOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReputationSendOutcome::Success => "success",
            ReputationSendOutcome::SerializeFail => "serialize_fail",
            ReputationSendOutcome::QueueFail => "queue_fail",
            ReputationSendOutcome::SignFail => "sign_fail",
            ReputationSendOutcome::SendFail => "send_fail",
            ReputationSendOutcome::OutOfMemory => "out_of_memory",
        }
    }
}

/// Result of admitting a device certificate into the keystore
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeystoreAdmissionOutcome {
    Success,
    /// First allocation attempt failed
    OutOfMemoryFirst,
    FailedToFreeSpace,
    /// Allocation failed again after freeing space
    OutOfMemorySecond,
    EncodeFail,
    EnqueueFail,
    VerifyFail,
}

impl KeystoreAdmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreAdmissionOutcome::Success => "success",
            KeystoreAdmissionOutcome::OutOfMemoryFirst => "out_of_memory_first",
            KeystoreAdmissionOutcome::FailedToFreeSpace => "failed_to_free_space",
            KeystoreAdmissionOutcome::OutOfMemorySecond => "out_of_memory_second",
            KeystoreAdmissionOutcome::EncodeFail => "encode_fail",
            KeystoreAdmissionOutcome::EnqueueFail => "enqueue_fail",
            KeystoreAdmissionOutcome::VerifyFail => "verify_fail",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    ReputationReceiveOutcome,
    ReputationSendOutcome,
    KeystoreAdmissionOutcome
);
