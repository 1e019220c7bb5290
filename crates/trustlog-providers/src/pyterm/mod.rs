mod discovery;
mod tokenizer;

pub use discovery::{DiscoveryConfig, PytermDiscovery};
pub use tokenizer::{PytermTokenizer, parse_timestamp, tokenize_line};
