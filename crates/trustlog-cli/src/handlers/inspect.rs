use crate::config::Config;
use crate::presentation::EventLine;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use std::path::Path;
use trustlog_engine::AnalysisSession;
use trustlog_providers::SourceAdapter;

pub fn handle(file: &Path, config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let log_dir = file.parent().unwrap_or_else(|| Path::new("."));
    let config = Config::resolve(config_path, log_dir)?;
    let adapter = SourceAdapter::pyterm(config.discovery);

    let reader = adapter
        .open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let mut session = AnalysisSession::new(config.analysis);
    for record in reader {
        let record = record?;
        let Some(event) = session.ingest(&record)? else {
            continue;
        };

        let line = EventLine {
            time: record.timestamp,
            event: &event,
        };
        match format {
            OutputFormat::Plain => println!("{}", line),
            OutputFormat::Json => println!("{}", serde_json::to_string(&line.to_json())?),
        }
    }

    Ok(())
}
