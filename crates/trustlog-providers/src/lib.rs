// Error types
pub mod error;

// Trait-based architecture (public API)
pub mod traits;

// Source implementations
pub mod pyterm;

pub use error::{Error, Result};
pub use pyterm::{DiscoveryConfig, PytermDiscovery, PytermTokenizer};
pub use traits::{LineTokenizer, LogDiscovery, LogFile, ProbeResult, RecordReader, SourceAdapter};
