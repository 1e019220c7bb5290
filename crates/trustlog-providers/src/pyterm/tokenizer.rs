use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use trustlog_types::{Record, Timestamp};

use crate::traits::LineTokenizer;

/// Serial capture line with a Contiki-NG module prefix
/// Example: "2021-03-04 12:00:00,123 # [INFO: trust-comm] Updating Edge ..."
static LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?)\s+#\s+\[\s*([A-Za-z]+)\s*:\s*([^\]]*?)\s*\]\s?(.*)$",
    )
    .unwrap()
});

pub struct PytermTokenizer;

impl LineTokenizer for PytermTokenizer {
    fn tokenize(&self, line: &str) -> Option<Record> {
        tokenize_line(line)
    }
}

/// Split one pyterm line into (timestamp, level, module, message)
pub fn tokenize_line(line: &str) -> Option<Record> {
    let line = line.trim_end();
    let caps = LINE_REGEX.captures(line)?;

    let timestamp = match parse_timestamp(&caps[1]) {
        Some(ts) => ts,
        None => {
            debug!(timestamp = &caps[1], "unparsable timestamp");
            return None;
        }
    };

    Some(Record::new(timestamp, &caps[2], &caps[3], &caps[4]))
}

/// Parse "YYYY-MM-DD HH:MM:SS[.,]fraction" (or with a 'T' separator)
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let normalized: String = text
        .chars()
        .map(|c| match c {
            ',' => '.',
            'T' => ' ',
            other => other,
        })
        .collect();

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_tokenize_info_line() {
        let record = tokenize_line(
            "2021-03-04 12:00:01,250 # [INFO: A-envmon  ] Generated message (len=10)\n",
        )
        .expect("should tokenize");

        assert_eq!(record.level, "INFO");
        assert_eq!(record.module, "A-envmon");
        assert_eq!(record.message, "Generated message (len=10)");
        assert_eq!(
            record.timestamp,
            NaiveDate::from_ymd_opt(2021, 3, 4)
                .unwrap()
                .and_hms_milli_opt(12, 0, 1, 250)
                .unwrap()
        );
    }

    #[test]
    fn test_tokenize_padded_level() {
        let record =
            tokenize_line("2021-03-04 12:00:01.5 # [ERR : keystore  ] keystore_add: enqueue failed for 00124b0014d52bd6")
                .expect("should tokenize");

        assert_eq!(record.level, "ERR");
        assert_eq!(record.module, "keystore");
        assert_eq!(record.timestamp.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_tokenize_keeps_message_brackets() {
        let record = tokenize_line(
            "2021-03-04T12:00:02 # [INFO: A-routing] Message sent to coap://[fd00::1]:5683",
        )
        .expect("should tokenize");

        assert_eq!(record.module, "A-routing");
        assert_eq!(record.message, "Message sent to coap://[fd00::1]:5683");
    }

    #[test]
    fn test_tokenize_rejects_non_records() {
        assert!(tokenize_line("").is_none());
        assert!(tokenize_line("2021-03-04 12:00:00,000 # Starting Contiki-NG").is_none());
        assert!(tokenize_line("[INFO: main] no timestamp").is_none());
        assert!(tokenize_line("2021-13-04 12:00:00 # [INFO: main] bad month").is_none());
    }

    #[test]
    fn test_parse_timestamp_without_fraction() {
        let ts = parse_timestamp("2021-03-04 12:00:00").unwrap();
        assert_eq!(ts.nanosecond(), 0);
    }
}
