use crate::config::Config;
use crate::presentation::HostReportView;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use trustlog_engine::{AnalysisOptions, AnalysisSession, SessionReport};
use trustlog_providers::{LogFile, SourceAdapter};

pub fn handle(
    log_dir: &Path,
    config_path: Option<&Path>,
    host: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let config = Config::resolve(config_path, log_dir)?;
    let adapter = SourceAdapter::pyterm(config.discovery.clone());

    info!("Looking for results in {}", log_dir.display());
    let mut files = adapter
        .scan(log_dir)
        .with_context(|| format!("Failed to scan {}", log_dir.display()))?;

    if let Some(host) = host {
        files.retain(|file| file.hostname == host);
        anyhow::ensure!(
            !files.is_empty(),
            "No {} log for host '{}' in {}",
            config.discovery.kind,
            host,
            log_dir.display()
        );
    }

    let mut reports: BTreeMap<String, SessionReport> = BTreeMap::new();
    for file in &files {
        let session = analyze_file(&adapter, file, config.analysis)?;
        let label = report_label(file, &reports);
        reports.insert(label, session.report());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Plain => {
            if reports.is_empty() {
                println!(
                    "No {} logs found in {}",
                    config.discovery.kind,
                    log_dir.display()
                );
            }
            let color = std::io::stdout().is_terminal();
            for (host, report) in &reports {
                print!("{}", HostReportView::new(host, report, color));
            }
        }
    }

    Ok(())
}

/// Run one session over one file, streaming its records.
///
/// A session aborted by its error policy stops consuming the file and is
/// returned as is; its report carries the aborting error.
pub fn analyze_file(
    adapter: &SourceAdapter,
    file: &LogFile,
    options: AnalysisOptions,
) -> Result<AnalysisSession> {
    info!(source = adapter.id(), "Processing {}...", file.path.display());

    let mut session = AnalysisSession::new(options);
    for record in adapter.open(&file.path)? {
        let record = record.with_context(|| format!("Failed to read {}", file.path.display()))?;
        if let Err(err) = session.ingest(&record) {
            warn!(host = %file.hostname, "Analysis aborted: {}", err);
            break;
        }
    }

    if !session.diagnostics().is_empty() {
        warn!(
            host = %file.hostname,
            "{} record(s) could not be interpreted",
            session.diagnostics().len()
        );
    }

    Ok(session)
}

/// Hostname, qualified by the variant when a host has several logs
fn report_label(file: &LogFile, reports: &BTreeMap<String, SessionReport>) -> String {
    match &file.variant {
        Some(variant) if reports.contains_key(&file.hostname) => {
            format!("{}.{}", file.hostname, variant)
        }
        _ => file.hostname.clone(),
    }
}
