use trustlog_types::ReputationSendOutcome;

use super::{ExtractResult, Fields};
use crate::patterns;

/// A "Received trust info via POST" line: the request side of a mid pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRequest {
    pub address: String,
    pub mid: u32,
}

pub fn received(text: &str) -> ExtractResult<ReceivedRequest> {
    let f = Fields::matched(&patterns::REPUTATION_RECEIVED, text, "trust received")?;

    Ok(ReceivedRequest {
        address: f.text(1).to_string(),
        mid: f.parse(2, "mid")?,
    })
}

/// Outcome lines that carry only the mid
pub fn outcome_mid(regex: &regex::Regex, text: &str, shape: &str) -> ExtractResult<u32> {
    let f = Fields::matched(regex, text, shape)?;
    f.parse(1, "mid")
}

/// The success line, which repeats the peer address
pub fn queued(text: &str) -> ExtractResult<ReceivedRequest> {
    let f = Fields::matched(&patterns::REPUTATION_QUEUED, text, "trust queued")?;

    Ok(ReceivedRequest {
        address: f.text(1).to_string(),
        mid: f.parse(2, "mid")?,
    })
}

/// Periodic broadcast lines, matched by literal text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendLine {
    Outcome(ReputationSendOutcome),
    /// Broadcasting was switched off for the rest of the run
    Disabled,
}

pub const SEND_DISABLED: &str = "Periodic broadcast of trust information disabled";
pub const SEND_OUT_OF_MEMORY: &str = "Cannot allocate memory for periodic_action trust request";

/// Prefix -> outcome, in evaluation order
pub const SEND_PREFIXES: &[(&str, ReputationSendOutcome)] = &[
    (
        "trust periodic_action: serialise_trust failed",
        ReputationSendOutcome::SerializeFail,
    ),
    (
        "trust periodic_action: Unable to sign message",
        ReputationSendOutcome::QueueFail,
    ),
    (
        "trust_tx_continue: Sign of trust information failed",
        ReputationSendOutcome::SignFail,
    ),
    (
        "trust_tx_continue: coap_send_request trust failed",
        ReputationSendOutcome::SendFail,
    ),
    (
        "trust_tx_continue: coap_send_request trust done",
        ReputationSendOutcome::Success,
    ),
];

pub fn send_line(text: &str) -> Option<SendLine> {
    if text == SEND_DISABLED {
        return Some(SendLine::Disabled);
    }
    if text == SEND_OUT_OF_MEMORY {
        return Some(SendLine::Outcome(ReputationSendOutcome::OutOfMemory));
    }
    SEND_PREFIXES
        .iter()
        .find(|(prefix, _)| text.starts_with(prefix))
        .map(|(_, outcome)| SendLine::Outcome(*outcome))
}
