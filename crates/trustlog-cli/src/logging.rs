//! Diagnostics go to stderr; stdout is reserved for the report.

use crate::types::LogLevel;
use is_terminal::IsTerminal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
