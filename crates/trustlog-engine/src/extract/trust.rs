use trustlog_types::*;

use super::{ExtractResult, Fields};
use crate::patterns;

pub fn challenge_response_update(time: Timestamp, text: &str) -> ExtractResult<TrustModelUpdate> {
    let f = Fields::matched(&patterns::CHALLENGE_RESPONSE_UPDATE, text, "challenge-response")?;

    let kind = ChallengeResponseKind::try_from(f.parse::<u8>(2, "challenge-response type")?)?;
    let observation = Observation::ChallengeResponse(ChallengeResponse {
        kind,
        good: f.flag(3, "good")?,
    });

    Ok(TrustModelUpdate {
        time,
        peer: f.text(1).to_string(),
        observation,
        before: TrustState::EdgeResource(EdgeResourceTrustState {
            epoch: f.parse(4, "epoch")?,
            bad: f.flag(5, "bad")?,
        }),
        after: TrustState::EdgeResource(EdgeResourceTrustState {
            epoch: f.parse(6, "epoch")?,
            bad: f.flag(7, "bad")?,
        }),
    })
}

pub fn throughput_update(time: Timestamp, text: &str) -> ExtractResult<TrustModelUpdate> {
    let f = Fields::matched(&patterns::THROUGHPUT_UPDATE, text, "throughput")?;

    let observation = Observation::Throughput(ThroughputSample {
        capability: f.text(2).to_string(),
        direction: f.text(3).parse()?,
        throughput: f.parse(4, "throughput")?,
    });

    Ok(TrustModelUpdate {
        time,
        peer: f.text(1).to_string(),
        observation,
        before: gaussian(&f, 5)?,
        after: gaussian(&f, 8)?,
    })
}

pub fn last_ping_update(time: Timestamp, text: &str) -> ExtractResult<TrustModelUpdate> {
    let f = Fields::matched(&patterns::LAST_PING_UPDATE, text, "last ping")?;

    Ok(TrustModelUpdate {
        time,
        peer: f.text(1).to_string(),
        observation: Observation::LastPing,
        before: TrustState::LastPing {
            ticks: f.parse(2, "ping ticks")?,
        },
        after: TrustState::LastPing {
            ticks: f.parse(3, "ping ticks")?,
        },
    })
}

pub fn task_submission_update(time: Timestamp, text: &str) -> ExtractResult<TrustModelUpdate> {
    let f = Fields::matched(&patterns::TASK_SUBMISSION_UPDATE, text, "task submission")?;

    let observation = Observation::TaskSubmission(TaskSubmission {
        capability: f.text(2).to_string(),
        request_status: f.parse(3, "request status")?,
        coap_status: f.parse(4, "coap status")?,
    });

    beta_update(time, &f, observation, 5)
}

pub fn task_result_update(time: Timestamp, text: &str) -> ExtractResult<TrustModelUpdate> {
    let f = Fields::matched(&patterns::TASK_RESULT_UPDATE, text, "task result")?;

    let observation = Observation::TaskResult(TaskResult {
        capability: f.text(2).to_string(),
        result: f.parse(3, "result")?,
    });

    beta_update(time, &f, observation, 4)
}

pub fn result_quality_update(time: Timestamp, text: &str) -> ExtractResult<TrustModelUpdate> {
    let f = Fields::matched(&patterns::RESULT_QUALITY_UPDATE, text, "result quality")?;

    let observation = Observation::ResultQuality(ResultQuality {
        capability: f.text(2).to_string(),
        good: f.flag(3, "good")?,
    });

    beta_update(time, &f, observation, 4)
}

/// N(mean, var, n) starting at `first`
fn gaussian(f: &Fields<'_>, first: usize) -> ExtractResult<TrustState> {
    Ok(TrustState::Throughput(ThroughputTrustState {
        mean: f.parse(first, "mean")?,
        variance: f.parse(first + 1, "variance")?,
        count: f.parse(first + 2, "sample count")?,
    }))
}

/// Beta(alpha, beta) -> Beta(alpha, beta) starting at `first`
fn beta_update(
    time: Timestamp,
    f: &Fields<'_>,
    observation: Observation,
    first: usize,
) -> ExtractResult<TrustModelUpdate> {
    Ok(TrustModelUpdate {
        time,
        peer: f.text(1).to_string(),
        observation,
        before: TrustState::Beta(BetaTrustState {
            alpha: f.parse(first, "alpha")?,
            beta: f.parse(first + 1, "beta")?,
        }),
        after: TrustState::Beta(BetaTrustState {
            alpha: f.parse(first + 2, "alpha")?,
            beta: f.parse(first + 3, "beta")?,
        }),
    })
}
