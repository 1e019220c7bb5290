use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;
use crate::record::Timestamp;

// NOTE: Trust model updates
//
// The firmware prints every trust-model update as "before -> after" on one
// line. The kind of state printed depends on the observation:
// - challenge-response: EdgeResourceTM(epoch, bad)
// - throughput in/out:  N(mean, var, n)
// - task submission / task result / result quality: Beta(alpha, beta)
// - last ping: raw clock ticks

/// How a challenge-response round ended, as numbered by the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeResponseKind {
    NoAck,
    Timeout,
    Response,
}

impl TryFrom<u8> for ChallengeResponseKind {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ChallengeResponseKind::NoAck),
            1 => Ok(ChallengeResponseKind::Timeout),
            2 => Ok(ChallengeResponseKind::Response),
            other => Err(Error::invalid("challenge-response type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub kind: ChallengeResponseKind,
    pub good: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThroughputDirection {
    In,
    Out,
}

impl FromStr for ThroughputDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(ThroughputDirection::In),
            "out" => Ok(ThroughputDirection::Out),
            other => Err(Error::invalid("throughput direction", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputSample {
    pub capability: String,
    pub direction: ThroughputDirection,
    /// Observed bytes per clock tick
    pub throughput: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub capability: String,
    pub request_status: i32,
    pub coap_status: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub capability: String,
    pub result: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultQuality {
    pub capability: String,
    pub good: bool,
}

/// The evidence a trust-model update was driven by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Observation {
    ChallengeResponse(ChallengeResponse),
    Throughput(ThroughputSample),
    TaskSubmission(TaskSubmission),
    TaskResult(TaskResult),
    ResultQuality(ResultQuality),
    /// A ping response arrived; the tick values live in the states
    LastPing,
}

impl Observation {
    pub fn capability(&self) -> Option<&str> {
        match self {
            Observation::Throughput(o) => Some(&o.capability),
            Observation::TaskSubmission(o) => Some(&o.capability),
            Observation::TaskResult(o) => Some(&o.capability),
            Observation::ResultQuality(o) => Some(&o.capability),
            Observation::ChallengeResponse(_) | Observation::LastPing => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Observation::ChallengeResponse(_) => "cr",
            Observation::Throughput(_) => "throughput",
            Observation::TaskSubmission(_) => "task_submission",
            Observation::TaskResult(_) => "task_result",
            Observation::ResultQuality(_) => "result_quality",
            Observation::LastPing => "last_ping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeResourceTrustState {
    pub epoch: u64,
    /// Printed as either "bad" or "blacklisted" depending on firmware revision
    pub bad: bool,
}

/// Running Gaussian statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputTrustState {
    pub mean: f64,
    pub variance: f64,
    pub count: u64,
}

/// Beta distribution counts (good / bad evidence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetaTrustState {
    pub alpha: u64,
    pub beta: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum TrustState {
    EdgeResource(EdgeResourceTrustState),
    Throughput(ThroughputTrustState),
    Beta(BetaTrustState),
    LastPing { ticks: u64 },
}

/// One "Updating Edge ..." line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustModelUpdate {
    pub time: Timestamp,
    /// Edge identity as printed by the firmware
    pub peer: String,
    pub observation: Observation,
    pub before: TrustState,
    pub after: TrustState,
}

/// Position printed after a banded trust sample (`at <index>/<count>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandPosition {
    pub index: u32,
    pub count: u32,
}

/// One sampled trust value for a (peer, capability) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustValue {
    pub peer: String,
    pub capability: String,
    pub time: Timestamp,
    pub value: f64,
    pub band: BandPosition,
}
