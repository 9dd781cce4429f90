//! Detection report writers
//!
//! Serializes [`ClassificationResult`]s as CSV (the default) or JSON.
//! Reports are written to a temporary file next to the destination and
//! moved into place once complete.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

use crate::border::{BorderError, ClassificationResult, Result};

/// CSV column names, in order
pub const CSV_HEADER: [&str; 6] = [
    "filename",
    "top_border",
    "bottom_border",
    "left_border",
    "right_border",
    "sides_with_border",
];

/// CSV record terminator
const CSV_LINE_END: &str = "\r\n";

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {}", other)),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    image_count: usize,
    results: Vec<JsonRecord<'a>>,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    filename: &'a str,
    top_border: u32,
    bottom_border: u32,
    left_border: u32,
    right_border: u32,
    sides_with_border: Vec<&'static str>,
}

/// Quote a CSV field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render results as CSV text
pub fn render_csv(results: &[ClassificationResult]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push_str(CSV_LINE_END);

    for result in results {
        let depths = result.depths;
        let row = [
            csv_field(&result.filename),
            depths.top.to_string(),
            depths.bottom.to_string(),
            depths.left.to_string(),
            depths.right.to_string(),
            csv_field(&result.sides_label()),
        ];
        out.push_str(&row.join(","));
        out.push_str(CSV_LINE_END);
    }

    out
}

/// Render results as pretty-printed JSON
pub fn render_json(results: &[ClassificationResult]) -> Result<String> {
    let report = JsonReport {
        generated_at: Local::now().to_rfc3339(),
        image_count: results.len(),
        results: results
            .iter()
            .map(|r| JsonRecord {
                filename: &r.filename,
                top_border: r.depths.top,
                bottom_border: r.depths.bottom,
                left_border: r.depths.left,
                right_border: r.depths.right,
                sides_with_border: r.sides_with_border.iter().map(|e| e.name()).collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).map_err(|e| BorderError::Report(e.to_string()))
}

/// Write a report to `path`.
///
/// Returns `Ok(false)` without touching the filesystem when `results` is
/// empty.
pub fn write_report(
    results: &[ClassificationResult],
    path: &Path,
    format: ReportFormat,
) -> Result<bool> {
    if results.is_empty() {
        return Ok(false);
    }

    let body = match format {
        ReportFormat::Csv => render_csv(results),
        ReportFormat::Json => render_json(results)?,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(body.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| BorderError::IoError(e.error))?;

    Ok(true)
}
