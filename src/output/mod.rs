//! Report output
//!
//! This module provides:
//! - JSON report for machine processing
//! - Spreadsheet (CSV) report for review in a spreadsheet application
//! - Text output for the terminal summary and update plans

mod json;
mod spreadsheet;
mod text;

pub use json::JsonReport;
pub use spreadsheet::SpreadsheetReport;
pub use text::TextFormatter;

use crate::domain::{PackageRecord, ReportSummary};
use crate::error::ReportError;
use crate::manifest::write_atomic;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Report file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Spreadsheet table written as CSV (`.csv`), opens in Excel
    #[default]
    Excel,
    /// JSON document
    Json,
}

impl ReportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Everything a report emitter renders
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub project: &'a str,
    pub project_version: Option<&'a str>,
    pub generated_at: DateTime<Utc>,
    pub records: &'a [PackageRecord],
    pub summary: &'a ReportSummary,
}

/// Trait for report emitters
pub trait ReportEmitter {
    /// Render a report to `writer`
    fn render(&self, report: &Report<'_>, writer: &mut dyn Write) -> Result<(), ReportError>;
}

/// Create the emitter for a format
pub fn create_emitter(format: ReportFormat) -> Box<dyn ReportEmitter> {
    match format {
        ReportFormat::Excel => Box::new(SpreadsheetReport::new()),
        ReportFormat::Json => Box::new(JsonReport::new()),
    }
}

/// Report path: `<output_dir>/<project>-dependencies.<ext>`
///
/// Scoped names lose their `@` and have `/` replaced with `-`.
pub fn report_path(output_dir: &Path, project: &str, format: ReportFormat) -> PathBuf {
    let stem: String = project
        .trim_start_matches('@')
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    output_dir.join(format!("{}-dependencies.{}", stem, format.extension()))
}

/// Render and write a report file
///
/// An existing file is only replaced when `force` is set.
pub fn write_report(
    report: &Report<'_>,
    format: ReportFormat,
    output_dir: &Path,
    force: bool,
) -> Result<PathBuf, ReportError> {
    let path = report_path(output_dir, report.project, format);
    if path.exists() && !force {
        return Err(ReportError::AlreadyExists { path });
    }

    let mut buffer = Vec::new();
    create_emitter(format).render(report, &mut buffer)?;

    std::fs::create_dir_all(output_dir).map_err(|e| ReportError::WriteError {
        path: output_dir.to_path_buf(),
        source: e,
    })?;
    write_atomic(&path, &buffer).map_err(|e| ReportError::WriteError {
        path: path.clone(),
        source: e,
    })?;

    info!(path = %path.display(), records = report.records.len(), "report written");
    Ok(path)
}
