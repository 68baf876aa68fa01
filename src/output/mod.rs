//! Result rendering
//!
//! - **text**: aligned plain-text table with human units
//! - **json**: pretty-printed machine-readable report

pub mod json;
pub mod text;

use crate::config::OutputFormat;
use crate::suite::SuiteReport;

/// Render `report` in the requested format
pub fn render(report: &SuiteReport, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render(report)),
        OutputFormat::Json => json::render(report),
    }
}
