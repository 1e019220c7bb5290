//! Analysis session: owns every piece of per-stream state and drives the
//! router over records one at a time.
//!
//! A session is a legal snapshot after any prefix of its input, so callers
//! reading a live source may stop feeding records at any point.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace, warn};
use trustlog_types::{
    KeystoreAdmissionOutcome, Record, ReputationReceiveOutcome, ReputationSendOutcome, Task,
    TaskDetails, Timestamp, TrustModelUpdate, TrustValue,
};

use crate::counters::{KeyedCounts, KeystoreCounters, ReputationSendCounters};
use crate::error::{AnalysisError, Diagnostic, Result};
use crate::handlers::{self, CorrelationState};
use crate::options::{AnalysisOptions, ErrorPolicy};
use crate::report::SessionReport;
use crate::router::{self, Activation};

/// One typed event produced from one record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    TrustModelUpdate(TrustModelUpdate),
    Task(Task),
    TrustValue(TrustValue),
    ReputationReceive {
        peer: String,
        outcome: ReputationReceiveOutcome,
    },
    ReputationSend(ReputationSendOutcome),
    ReputationSendDisabled,
    KeystoreAdmission {
        device: String,
        outcome: KeystoreAdmissionOutcome,
        time: Timestamp,
    },
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::TrustModelUpdate(update) => {
                write!(f, "trust-update {} {}", update.peer, update.observation.kind())?;
                if let Some(capability) = update.observation.capability() {
                    write!(f, " capability={}", capability)?;
                }
                Ok(())
            }
            SessionEvent::Task(task) => write!(
                f,
                "task {} {} len={}",
                task.target,
                task.details.capability(),
                task.details.length()
            ),
            SessionEvent::TrustValue(value) => write!(
                f,
                "trust-value {} {}={} band={}/{}",
                value.peer, value.capability, value.value, value.band.index, value.band.count
            ),
            SessionEvent::ReputationReceive { peer, outcome } => {
                write!(f, "reputation-receive {} {}", peer, outcome)
            }
            SessionEvent::ReputationSend(outcome) => write!(f, "reputation-send {}", outcome),
            SessionEvent::ReputationSendDisabled => f.write_str("reputation-send disabled"),
            SessionEvent::KeystoreAdmission {
                device, outcome, ..
            } => write!(f, "keystore {} {}", device, outcome),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    options: AnalysisOptions,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
    records: u64,
    trust_updates: Vec<TrustModelUpdate>,
    tasks: Vec<Task>,
    /// None until the first banded sampling record
    trust_values: Option<Vec<TrustValue>>,
    reputation_receive: KeyedCounts<ReputationReceiveOutcome>,
    reputation_send: ReputationSendCounters,
    keystore: KeystoreCounters,
    diagnostics: Vec<Diagnostic>,
    /// The fault that stopped the session under ErrorPolicy::Abort
    aborted: Option<AnalysisError>,
    correlation: CorrelationState,
}

impl AnalysisSession {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Consume one record.
    ///
    /// Returns the event the record produced, if any. An `Err` is only
    /// returned for correlation faults under [`ErrorPolicy::Abort`]; every
    /// other fault is kept as a [`Diagnostic`] and processing continues.
    pub fn ingest(&mut self, record: &Record) -> Result<Option<SessionEvent>> {
        if self.start_time.is_none() {
            self.start_time = Some(record.timestamp);
        }
        self.end_time = Some(record.timestamp);
        self.records += 1;

        let Some(dispatch) = router::dispatch(&record.module, &record.message) else {
            trace!(module = %record.module, "No route for module");
            return Ok(None);
        };

        if let Some(activation) = dispatch.route.activates {
            self.activate(activation);
        }

        let Some(handler) = dispatch.handler else {
            trace!(module = %record.module, message = %record.message, "Unrecognized message");
            return Ok(None);
        };

        match handlers::handle(handler, record, &mut self.correlation, &self.options) {
            Ok(handled) => {
                if let Some(warning) = handled.warning {
                    self.diagnose(record, warning);
                }
                if let Some(event) = &handled.event {
                    self.apply(event);
                }
                Ok(handled.event)
            }
            Err(err) if err.is_correlation_fault() && self.options.correlation == ErrorPolicy::Abort => {
                if self.aborted.is_none() {
                    self.aborted = Some(err.clone());
                }
                Err(err)
            }
            Err(err) => {
                self.diagnose(record, err);
                Ok(None)
            }
        }
    }

    fn activate(&mut self, activation: Activation) {
        match activation {
            Activation::BandedSampling => {
                if self.trust_values.is_none() {
                    debug!("Banded trust sampling active");
                    self.trust_values = Some(Vec::new());
                }
            }
        }
    }

    fn diagnose(&mut self, record: &Record, error: AnalysisError) {
        warn!(time = %record.timestamp, "{}", error);
        self.diagnostics.push(Diagnostic {
            time: record.timestamp,
            module: record.module.clone(),
            error,
        });
    }

    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::TrustModelUpdate(update) => self.trust_updates.push(update.clone()),
            SessionEvent::Task(task) => self.tasks.push(task.clone()),
            SessionEvent::TrustValue(value) => self
                .trust_values
                .get_or_insert_with(Vec::new)
                .push(value.clone()),
            SessionEvent::ReputationReceive { peer, outcome } => {
                self.reputation_receive.increment(peer, *outcome)
            }
            SessionEvent::ReputationSend(outcome) => {
                if !self.reputation_send.record(*outcome) {
                    trace!(%outcome, "Send outcome after broadcast was disabled");
                }
            }
            SessionEvent::ReputationSendDisabled => self.reputation_send.disable(),
            SessionEvent::KeystoreAdmission {
                device,
                outcome,
                time,
            } => {
                self.keystore.record(device, *outcome, *time);
            }
        }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    /// Number of records consumed, routed or not
    pub fn record_count(&self) -> u64 {
        self.records
    }

    pub fn trust_updates(&self) -> &[TrustModelUpdate] {
        &self.trust_updates
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Banded samples, or None if no sampling record was seen
    pub fn trust_values(&self) -> Option<&[TrustValue]> {
        self.trust_values.as_deref()
    }

    pub fn reputation_receive(&self) -> &KeyedCounts<ReputationReceiveOutcome> {
        &self.reputation_receive
    }

    pub fn reputation_send(&self) -> &ReputationSendCounters {
        &self.reputation_send
    }

    pub fn keystore(&self) -> &KeystoreCounters {
        &self.keystore
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The error that aborted the session, if any
    pub fn aborted(&self) -> Option<&AnalysisError> {
        self.aborted.as_ref()
    }

    /// Details generated but not yet sent, by module
    pub fn pending_task(&self, module: &str) -> Option<&TaskDetails> {
        self.correlation.pending.pending(module)
    }

    pub fn pending_task_count(&self) -> usize {
        self.correlation.pending.len()
    }

    /// Address of an in-flight reputation request
    pub fn tracked_mid(&self, mid: u32) -> Option<&str> {
        self.correlation.receive.tracked(mid)
    }

    pub fn tracked_mid_count(&self) -> usize {
        self.correlation.receive.len()
    }

    /// Diagnostics grouped by error kind
    pub fn diagnostic_counts(&self) -> BTreeMap<&'static str, u64> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.error.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn report(&self) -> SessionReport {
        SessionReport::from_session(self)
    }
}
