//! JSON output
//!
//! The report is the serialized [`SuiteReport`] wrapped with the tool name,
//! version and an RFC 3339 timestamp.

use crate::suite::SuiteReport;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    #[serde(flatten)]
    pub report: &'a SuiteReport,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a SuiteReport) -> Self {
        Self::at(report, Utc::now())
    }

    pub fn at(report: &'a SuiteReport, time: DateTime<Utc>) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            timestamp: time.to_rfc3339_opts(SecondsFormat::Millis, true),
            report,
        }
    }
}

/// Pretty-printed JSON document for `report`
pub fn render(report: &SuiteReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IoMode, PatternType};
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn empty_report() -> SuiteReport {
        SuiteReport {
            target: PathBuf::from("bench.dat"),
            platform: "linux".to_string(),
            io_mode: IoMode::Synchronous,
            file_size: 8192,
            block_size: 4096,
            duration_secs: 1.5,
            results: Vec::new(),
            failure: None,
            skipped: vec![PatternType::RandomRead],
            cleaned_up: false,
        }
    }

    #[test]
    fn test_json_fields() {
        let report = empty_report();
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let value = serde_json::to_value(JsonReport::at(&report, time)).unwrap();

        assert_eq!(value["tool"], "diskpulse");
        assert_eq!(value["timestamp"], "2024-03-01T12:30:00.000Z");
        assert_eq!(value["io_mode"], "synchronous");
        assert_eq!(value["skipped"][0], "random_read");
        assert_eq!(value["duration_secs"], 1.5);
        assert!(value.get("failure").is_none());
    }

    #[test]
    fn test_render_roundtrips_report() {
        let report = empty_report();
        let text = render(&report).unwrap();
        let parsed: SuiteReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report);
    }
}
