use serde::Serialize;
use trustlog_types::{
    KeystoreAdmissionOutcome, ReputationReceiveOutcome, Task, Timestamp, TrustModelUpdate,
    TrustValue,
};

use crate::counters::{KeyedCounts, ReputationSendCounters};
use crate::error::{AnalysisError, Diagnostic};
use crate::options::AnalysisOptions;
use crate::session::AnalysisSession;

/// First sighting of one (device, outcome) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstSeen {
    pub device: String,
    pub outcome: KeystoreAdmissionOutcome,
    pub time: Timestamp,
    /// Offset from the first record of the session
    pub since_start_ms: i64,
}

/// Serializable snapshot of everything a session has aggregated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub options: AnalysisOptions,
    /// Set when the session stopped early; the rest is the snapshot up to that record
    pub aborted: Option<AnalysisError>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub duration_ms: i64,
    pub records: u64,
    pub trust_updates: Vec<TrustModelUpdate>,
    pub tasks: Vec<Task>,
    pub trust_values: Option<Vec<TrustValue>>,
    pub reputation_send: ReputationSendCounters,
    pub reputation_receive: KeyedCounts<ReputationReceiveOutcome>,
    pub keystore: KeyedCounts<KeystoreAdmissionOutcome>,
    pub keystore_first_seen: Vec<FirstSeen>,
    pub diagnostics: Vec<Diagnostic>,
    pub pending_tasks: usize,
    pub tracked_mids: usize,
}

impl SessionReport {
    pub fn from_session(session: &AnalysisSession) -> Self {
        let start = session.start_time();
        let since_start = |time: Timestamp| start.map_or(0, |s| (time - s).num_milliseconds());

        let duration_ms = match (start, session.end_time()) {
            (Some(start), Some(end)) => (end - start).num_milliseconds(),
            _ => 0,
        };

        let keystore_first_seen = session
            .keystore()
            .first_seen_iter()
            .map(|(device, outcome, time)| FirstSeen {
                device: device.to_string(),
                outcome,
                time,
                since_start_ms: since_start(time),
            })
            .collect();

        Self {
            options: *session.options(),
            aborted: session.aborted().cloned(),
            start_time: start,
            end_time: session.end_time(),
            duration_ms,
            records: session.record_count(),
            trust_updates: session.trust_updates().to_vec(),
            tasks: session.tasks().to_vec(),
            trust_values: session.trust_values().map(<[TrustValue]>::to_vec),
            reputation_send: session.reputation_send().clone(),
            reputation_receive: session.reputation_receive().clone(),
            keystore: session.keystore().counts().clone(),
            keystore_first_seen,
            diagnostics: session.diagnostics().to_vec(),
            pending_tasks: session.pending_task_count(),
            tracked_mids: session.tracked_mid_count(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
