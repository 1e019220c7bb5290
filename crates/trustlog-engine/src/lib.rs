// Engine module - turns tokenized node log records into protocol-level events
// and per-entity aggregates. Record acquisition lives in trustlog-providers.

pub mod correlation;
pub mod counters;
pub mod error;
pub mod extract;
mod handlers;
pub mod options;
pub mod patterns;
pub mod report;
pub mod router;
pub mod session;

pub use correlation::{PendingTasks, ReceiveCorrelation};
pub use counters::{KeyedCounts, KeystoreCounters, OutcomeCounts, ReputationSendCounters};
pub use error::{AnalysisError, Diagnostic, Result};
pub use options::{AnalysisOptions, ErrorPolicy, PendingPolicy};
pub use report::{FirstSeen, SessionReport};
pub use router::{Activation, Dispatch, Handler, Predicate, Route, Rule};
pub use session::{AnalysisSession, SessionEvent};

use trustlog_types::Record;

// Façade API

/// Run one session over a finite record stream.
///
/// Stops at the first error the options classify as fatal; the returned
/// session holds everything consumed up to that point.
pub fn analyze<I>(records: I, options: AnalysisOptions) -> (AnalysisSession, Result<()>)
where
    I: IntoIterator<Item = Record>,
{
    let mut session = AnalysisSession::new(options);
    for record in records {
        if let Err(err) = session.ingest(&record) {
            return (session, Err(err));
        }
    }
    (session, Ok(()))
}
