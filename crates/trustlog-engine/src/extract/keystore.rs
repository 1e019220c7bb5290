use trustlog_types::KeystoreAdmissionOutcome;

use crate::patterns;

/// A certificate admission line, resolved against the ordered shape table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub device: String,
    pub outcome: KeystoreAdmissionOutcome,
}

pub fn admission(text: &str) -> Option<Admission> {
    patterns::first_match(&patterns::KEYSTORE_ADMISSION, text).map(|(outcome, device)| Admission {
        device: device.to_string(),
        outcome,
    })
}
