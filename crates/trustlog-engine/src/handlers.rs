//! Record handlers: run one extractor and apply it to correlation state.
//!
//! Every handler extracts all fields before touching state, so a record that
//! fails extraction leaves the session exactly as it was.

use regex::Regex;
use tracing::debug;
use trustlog_types::{Record, ReputationReceiveOutcome, Task, TaskDetails, TrustModelUpdate};

use crate::correlation::{PendingTasks, ReceiveCorrelation};
use crate::error::{AnalysisError, Result};
use crate::extract::{self, ExtractResult, reputation::SendLine};
use crate::options::{AnalysisOptions, ErrorPolicy, PendingPolicy};
use crate::patterns;
use crate::router::Handler;
use crate::session::SessionEvent;

/// Pairing state owned by one session
#[derive(Debug, Clone, Default)]
pub(crate) struct CorrelationState {
    pub(crate) pending: PendingTasks,
    pub(crate) receive: ReceiveCorrelation,
}

/// What a handled record produced
#[derive(Debug, Default)]
pub(crate) struct Handled {
    pub(crate) event: Option<SessionEvent>,
    /// A recoverable fault noticed while the record was still applied
    pub(crate) warning: Option<AnalysisError>,
}

impl Handled {
    fn nothing() -> Self {
        Self::default()
    }

    fn event(event: SessionEvent) -> Self {
        Self {
            event: Some(event),
            warning: None,
        }
    }

    fn warning(warning: AnalysisError) -> Self {
        Self {
            event: None,
            warning: Some(warning),
        }
    }
}

fn shape<T>(record: &Record, result: ExtractResult<T>) -> Result<T> {
    result.map_err(|err| AnalysisError::unparsable(&record.module, &record.message, err.0))
}

pub(crate) fn handle(
    handler: Handler,
    record: &Record,
    state: &mut CorrelationState,
    options: &AnalysisOptions,
) -> Result<Handled> {
    let time = record.timestamp;
    let text = record.message.as_str();

    match handler {
        Handler::ChallengeResponseUpdate => {
            trust_update(record, extract::trust::challenge_response_update(time, text))
        }
        Handler::ThroughputUpdate => {
            trust_update(record, extract::trust::throughput_update(time, text))
        }
        Handler::LastPingUpdate => {
            trust_update(record, extract::trust::last_ping_update(time, text))
        }
        Handler::TaskSubmissionUpdate => {
            trust_update(record, extract::trust::task_submission_update(time, text))
        }
        Handler::TaskResultUpdate => {
            trust_update(record, extract::trust::task_result_update(time, text))
        }
        Handler::ResultQualityUpdate => {
            trust_update(record, extract::trust::result_quality_update(time, text))
        }

        Handler::RoutingGenerated => {
            let details = shape(record, extract::task::routing_generated(text))?;
            generated(record, details, &mut state.pending, options)
        }
        Handler::MonitoringGenerated => {
            let details = shape(record, extract::task::monitoring_generated(text))?;
            generated(record, details, &mut state.pending, options)
        }
        Handler::TaskSent => task_sent(record, &mut state.pending),

        Handler::BandedTrustValue => {
            let value = shape(record, extract::band::trust_value(time, text))?;
            Ok(Handled::event(SessionEvent::TrustValue(value)))
        }

        Handler::ReputationReceived => received(record, &mut state.receive, options),
        Handler::ReputationMissingKey => {
            let mid = outcome_mid(record, &patterns::REPUTATION_MISSING_KEY, "missing key")?;
            resolve(record, mid, ReputationReceiveOutcome::MissingKey, &mut state.receive)
        }
        Handler::ReputationOutOfMemory => {
            let mid = outcome_mid(record, &patterns::REPUTATION_OUT_OF_MEMORY, "out of memory")?;
            resolve(record, mid, ReputationReceiveOutcome::OutOfMemory, &mut state.receive)
        }
        Handler::ReputationVerifyFailed => {
            let mid = outcome_mid(record, &patterns::REPUTATION_VERIFY_FAILED, "queue verify failed")?;
            resolve(record, mid, ReputationReceiveOutcome::VerifyFail, &mut state.receive)
        }
        Handler::ReputationQueued => queued(record, &mut state.receive),

        Handler::ReputationSend => Ok(match extract::reputation::send_line(text) {
            Some(SendLine::Disabled) => Handled::event(SessionEvent::ReputationSendDisabled),
            Some(SendLine::Outcome(outcome)) => {
                Handled::event(SessionEvent::ReputationSend(outcome))
            }
            None => Handled::nothing(),
        }),

        Handler::KeystoreAdmission => Ok(match extract::keystore::admission(text) {
            Some(admission) => Handled::event(SessionEvent::KeystoreAdmission {
                device: admission.device,
                outcome: admission.outcome,
                time,
            }),
            None => Handled::nothing(),
        }),
    }
}

fn trust_update(record: &Record, update: ExtractResult<TrustModelUpdate>) -> Result<Handled> {
    let update = shape(record, update)?;
    Ok(Handled::event(SessionEvent::TrustModelUpdate(update)))
}

fn generated(
    record: &Record,
    details: TaskDetails,
    pending: &mut PendingTasks,
    options: &AnalysisOptions,
) -> Result<Handled> {
    let module = record.module.as_str();

    if let Some(previous) = pending.pending(module) {
        match options.duplicate_pending {
            PendingPolicy::Reject => {
                return Ok(Handled::warning(AnalysisError::DuplicatePending {
                    module: module.to_string(),
                }));
            }
            PendingPolicy::Overwrite => {
                debug!(module, ?previous, "Discarding unsent task");
            }
        }
    }

    pending.insert(module, details);
    Ok(Handled::nothing())
}

fn task_sent(record: &Record, pending: &mut PendingTasks) -> Result<Handled> {
    let target = shape(record, extract::task::task_target(&record.message))?;
    let details = pending
        .take(&record.module)
        .ok_or_else(|| AnalysisError::CorrelationMissing {
            module: record.module.clone(),
            correlation: "generated message".to_string(),
        })?;

    Ok(Handled::event(SessionEvent::Task(Task {
        target,
        time: record.timestamp,
        details,
    })))
}

fn received(
    record: &Record,
    receive: &mut ReceiveCorrelation,
    options: &AnalysisOptions,
) -> Result<Handled> {
    let request = shape(record, extract::reputation::received(&record.message))?;

    if let Some(previous) = receive.tracked(request.mid) {
        let err = AnalysisError::DuplicateCorrelation {
            mid: request.mid,
            previous: previous.to_string(),
            current: request.address.clone(),
        };
        if options.correlation == ErrorPolicy::Abort {
            return Err(err);
        }
        receive.track(request.mid, &request.address);
        return Ok(Handled::warning(err));
    }

    receive.track(request.mid, &request.address);
    Ok(Handled::nothing())
}

fn outcome_mid(record: &Record, regex: &Regex, shape_name: &str) -> Result<u32> {
    shape(
        record,
        extract::reputation::outcome_mid(regex, &record.message, shape_name),
    )
}

fn missing_mid(record: &Record, mid: u32) -> AnalysisError {
    AnalysisError::CorrelationMissing {
        module: record.module.clone(),
        correlation: format!("mid={}", mid),
    }
}

fn resolve(
    record: &Record,
    mid: u32,
    outcome: ReputationReceiveOutcome,
    receive: &mut ReceiveCorrelation,
) -> Result<Handled> {
    let peer = receive.resolve(mid).ok_or_else(|| missing_mid(record, mid))?;
    Ok(Handled::event(SessionEvent::ReputationReceive { peer, outcome }))
}

fn queued(record: &Record, receive: &mut ReceiveCorrelation) -> Result<Handled> {
    let request = shape(record, extract::reputation::queued(&record.message))?;
    let peer = receive
        .resolve(request.mid)
        .ok_or_else(|| missing_mid(record, request.mid))?;

    let warning = (peer != request.address).then(|| AnalysisError::AddressMismatch {
        mid: request.mid,
        tracked: peer.clone(),
        observed: request.address,
    });

    Ok(Handled {
        event: Some(SessionEvent::ReputationReceive {
            peer,
            outcome: ReputationReceiveOutcome::Success,
        }),
        warning,
    })
}
