use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::debug;
use trustlog_types::Record;

use crate::{Error, Result};

/// Log file discovery
///
/// Responsibilities:
/// - Recognize per-device log files from their names
/// - Locate them inside a results directory
pub trait LogDiscovery: Send + Sync {
    /// Unique source ID (e.g., "pyterm")
    fn id(&self) -> &'static str;

    /// Check if a file belongs to this source
    fn probe(&self, path: &Path) -> ProbeResult;

    /// Find every analyzable log file directly inside `log_dir`
    fn scan(&self, log_dir: &Path) -> Result<Vec<LogFile>>;
}

/// Raw text to Record conversion
///
/// Lines that are not log records (boot banners, shell echo) yield None.
pub trait LineTokenizer: Send + Sync {
    fn tokenize(&self, line: &str) -> Option<Record>;
}

// --- Helper types ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// File follows the naming convention; carries the decoded name
    Match(LogFile),
    NoMatch,
}

impl ProbeResult {
    pub fn is_match(&self) -> bool {
        matches!(self, ProbeResult::Match(_))
    }
}

/// A per-device log file, decoded from `<kind>.<hostname>[.<variant>].<suffix>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogFile {
    pub hostname: String,
    pub kind: String,
    pub variant: Option<String>,
    pub path: PathBuf,
}

/// Streams records out of any buffered reader, skipping non-record lines.
///
/// Invalid UTF-8 is decoded lossily, so serial line noise never ends the
/// stream. IO errors are yielded once and end the stream.
pub struct RecordReader<'a, R> {
    reader: R,
    tokenizer: &'a dyn LineTokenizer,
    buf: Vec<u8>,
    line_number: usize,
    done: bool,
}

impl<'a, R: BufRead> RecordReader<'a, R> {
    pub fn new(reader: R, tokenizer: &'a dyn LineTokenizer) -> Self {
        Self {
            reader,
            tokenizer,
            buf: Vec::new(),
            line_number: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_number += 1;
                    let line = String::from_utf8_lossy(&self.buf);
                    if let Some(record) = self.tokenizer.tokenize(&line) {
                        return Some(Ok(record));
                    }
                    debug!(line = self.line_number, "skipping non-record line");
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(Error::Io(err)));
                }
            }
        }
        None
    }
}

// --- Source Adapter ---

/// Adapter that bundles discovery and tokenization for one log source
pub struct SourceAdapter {
    pub discovery: Box<dyn LogDiscovery>,
    pub tokenizer: Box<dyn LineTokenizer>,
}

impl SourceAdapter {
    pub fn new(discovery: Box<dyn LogDiscovery>, tokenizer: Box<dyn LineTokenizer>) -> Self {
        Self {
            discovery,
            tokenizer,
        }
    }

    /// Create the pyterm source adapter
    pub fn pyterm(config: crate::pyterm::DiscoveryConfig) -> Self {
        Self::new(
            Box::new(crate::pyterm::PytermDiscovery::new(config)),
            Box::new(crate::pyterm::PytermTokenizer),
        )
    }

    /// Get source ID
    pub fn id(&self) -> &'static str {
        self.discovery.id()
    }

    pub fn scan(&self, log_dir: &Path) -> Result<Vec<LogFile>> {
        self.discovery.scan(log_dir)
    }

    /// Open a file and stream its records
    pub fn open(&self, path: &Path) -> Result<RecordReader<'_, std::io::BufReader<std::fs::File>>> {
        let file = std::fs::File::open(path)?;
        Ok(RecordReader::new(
            std::io::BufReader::new(file),
            self.tokenizer.as_ref(),
        ))
    }

    /// Read every record of a file, refusing files this source does not recognize
    pub fn read_records(&self, path: &Path) -> Result<Vec<Record>> {
        if !self.discovery.probe(path).is_match() {
            return Err(Error::Unsupported(path.to_path_buf()));
        }
        self.open(path)?.collect()
    }
}
