use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::traits::{LogDiscovery, LogFile, ProbeResult};
use crate::{Error, Result};

/// Which files in a results directory are analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File-name suffix after `<kind>.<hostname>[.<variant>].`
    pub suffix: String,
    /// Only files of this kind carry sensor-node records
    pub kind: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            suffix: "pyterm.log".to_string(),
            kind: "wsn".to_string(),
        }
    }
}

pub struct PytermDiscovery {
    config: DiscoveryConfig,
}

impl PytermDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    fn decode_name(&self, path: &Path) -> Option<LogFile> {
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_suffix(&self.config.suffix)?.strip_suffix('.')?;

        let mut parts = stem.splitn(3, '.');
        let kind = parts.next().filter(|s| !s.is_empty())?;
        let hostname = parts.next().filter(|s| !s.is_empty())?;
        let variant = parts.next().map(|s| s.to_string());

        Some(LogFile {
            hostname: hostname.to_string(),
            kind: kind.to_string(),
            variant,
            path: path.to_path_buf(),
        })
    }
}

impl LogDiscovery for PytermDiscovery {
    fn id(&self) -> &'static str {
        "pyterm"
    }

    fn probe(&self, path: &Path) -> ProbeResult {
        match self.decode_name(path) {
            Some(file) => ProbeResult::Match(file),
            None => ProbeResult::NoMatch,
        }
    }

    fn scan(&self, log_dir: &Path) -> Result<Vec<LogFile>> {
        if !log_dir.is_dir() {
            return Err(Error::NotADirectory(log_dir.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(log_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file = match self.probe(entry.path()) {
                ProbeResult::Match(file) => file,
                ProbeResult::NoMatch => {
                    debug!(path = %entry.path().display(), "not a pyterm log");
                    continue;
                }
            };

            if file.kind != self.config.kind {
                warn!(
                    path = %file.path.display(),
                    kind = %file.kind,
                    "skipping log: only {} logs carry node records",
                    self.config.kind
                );
                continue;
            }

            files.push(file);
        }

        files.sort();
        Ok(files)
    }
}
