//! Plain-text rendering of session reports and inspected events.

use owo_colors::OwoColorize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use trustlog_engine::{OutcomeCounts, ReputationSendCounters, SessionEvent, SessionReport};
use trustlog_types::Timestamp;

/// "H:MM:SS.mmm", the offset style of the console report
pub fn format_offset(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let millis = millis.unsigned_abs();
    let (secs, ms) = (millis / 1000, millis % 1000);
    format!(
        "{}{}:{:02}:{:02}.{:03}",
        sign,
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        ms
    )
}

fn write_counts<K: Ord + Copy + fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    counts: &OutcomeCounts<K>,
    indent: &str,
) -> fmt::Result {
    for (outcome, count) in counts.iter() {
        writeln!(f, "{}{}: {}", indent, outcome, count)?;
    }
    Ok(())
}

/// Console report for one host
pub struct HostReportView<'a> {
    host: &'a str,
    report: &'a SessionReport,
    color: bool,
}

impl<'a> HostReportView<'a> {
    pub fn new(host: &'a str, report: &'a SessionReport, color: bool) -> Self {
        Self {
            host,
            report,
            color,
        }
    }

    fn heading(&self, f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
        if self.color {
            writeln!(f, "{}", text.bold())
        } else {
            writeln!(f, "{}", text)
        }
    }
}

impl fmt::Display for HostReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        if self.color {
            writeln!(f, "{}", self.host.cyan().bold())?;
        } else {
            writeln!(f, "{}", self.host)?;
        }

        if let Some(err) = &report.aborted {
            writeln!(f, "Aborted: {}", err)?;
        }

        match &report.reputation_send {
            ReputationSendCounters::Disabled => writeln!(f, "Reputation send: disabled")?,
            ReputationSendCounters::Active(counts) => {
                self.heading(f, "Reputation send:")?;
                write_counts(f, counts, "  ")?;
            }
        }

        self.heading(f, "Reputation receive:")?;
        for (peer, counts) in report.reputation_receive.iter() {
            writeln!(f, "  {}:", peer)?;
            write_counts(f, counts, "    ")?;
        }

        self.heading(f, "Keystore add:")?;
        for (device, counts) in report.keystore.iter() {
            writeln!(f, "  {}:", device)?;
            write_counts(f, counts, "    ")?;
        }

        self.heading(f, "Keystore first:")?;
        for first in &report.keystore_first_seen {
            writeln!(
                f,
                "  {} {} +{}",
                first.device,
                first.outcome,
                format_offset(first.since_start_ms)
            )?;
        }

        writeln!(f, "Duration: {}", format_offset(report.duration_ms))?;
        writeln!(f, "Trust model updates: {}", report.trust_updates.len())?;
        writeln!(f, "Tasks: {}", report.tasks.len())?;
        match &report.trust_values {
            Some(values) => writeln!(f, "Trust samples: {}", values.len())?,
            None => writeln!(f, "Trust samples: not sampled")?,
        }

        writeln!(f, "Diagnostics: {}", report.diagnostics.len())?;
        let mut kinds: BTreeMap<&str, u64> = BTreeMap::new();
        for diagnostic in &report.diagnostics {
            *kinds.entry(diagnostic.error.kind()).or_insert(0) += 1;
        }
        for (kind, count) in kinds {
            writeln!(f, "  {}: {}", kind, count)?;
        }

        Ok(())
    }
}

/// One inspected event with the time of the record that produced it
pub struct EventLine<'a> {
    pub time: Timestamp,
    pub event: &'a SessionEvent,
}

impl EventLine<'_> {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "time": self.time,
            "event": self.event,
        })
    }
}

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time.format("%Y-%m-%d %H:%M:%S%.3f"), self.event)
    }
}
