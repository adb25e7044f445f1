//! Spreadsheet report
//!
//! Writes a CSV workbook: one header row and one row per package, then a
//! blank line and a summary table per dependency type. Spreadsheet
//! applications open it directly.

use crate::domain::{PackageVersionInfo, TierCounts};
use crate::error::ReportError;
use crate::output::{Report, ReportEmitter};
use std::io::Write;

const PACKAGE_HEADERS: &[&str] = &[
    "Package",
    "Type",
    "Required",
    "Installed",
    "Installed Date",
    "Last Patch",
    "Last Patch Date",
    "Last Minor",
    "Last Minor Date",
    "Latest",
    "Latest Date",
    "Status",
    "Deprecated",
    "Registry Source",
    "Error",
];

const SUMMARY_HEADERS: &[&str] = &[
    "Dependency Type",
    "Total",
    "Up To Date",
    "Patch",
    "Minor",
    "Major",
    "Unknown",
    "Outdated",
    "Deprecated",
];

/// CSV spreadsheet emitter
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetReport;

impl SpreadsheetReport {
    pub fn new() -> Self {
        Self
    }
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

fn encode_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::EncodeError {
        message: e.to_string(),
    }
}

/// Version and date cells for an optional version
fn version_cells(info: Option<&PackageVersionInfo>) -> [String; 2] {
    match info {
        Some(info) => [
            info.version.clone(),
            info.release_date.clone().unwrap_or_default(),
        ],
        None => [String::new(), String::new()],
    }
}

fn summary_row(label: &str, counts: &TierCounts) -> Vec<String> {
    vec![
        label.to_string(),
        counts.total.to_string(),
        counts.up_to_date.to_string(),
        counts.patch.to_string(),
        counts.minor.to_string(),
        counts.major.to_string(),
        counts.unknown.to_string(),
        counts.outdated.to_string(),
        counts.deprecated.to_string(),
    ]
}

impl ReportEmitter for SpreadsheetReport {
    fn render(&self, report: &Report<'_>, writer: &mut dyn Write) -> Result<(), ReportError> {
        {
            let mut packages = csv_writer(&mut *writer);
            packages.write_record(PACKAGE_HEADERS).map_err(encode_error)?;

            for record in report.records {
                let view = record.view();
                let [installed, installed_date] = version_cells(view.installed);
                let [patch, patch_date] = version_cells(view.last_patch);
                let [minor, minor_date] = version_cells(view.last_minor);
                let [latest, latest_date] = version_cells(view.latest);
                let deprecated = if record.is_deprecated() { "yes" } else { "" };

                packages
                    .write_record([
                        view.package_name,
                        view.dependency_type.manifest_key(),
                        view.version_required,
                        installed.as_str(),
                        installed_date.as_str(),
                        patch.as_str(),
                        patch_date.as_str(),
                        minor.as_str(),
                        minor_date.as_str(),
                        latest.as_str(),
                        latest_date.as_str(),
                        view.update_status,
                        deprecated,
                        view.registry_source.unwrap_or_default(),
                        view.fetch_error.unwrap_or_default(),
                    ])
                    .map_err(encode_error)?;
            }
            packages.flush().map_err(encode_error)?;
        }

        writeln!(writer).map_err(encode_error)?;

        let mut summary = csv_writer(&mut *writer);
        summary.write_record(SUMMARY_HEADERS).map_err(encode_error)?;
        for group in &report.summary.by_type {
            summary
                .write_record(summary_row(
                    group.dependency_type.manifest_key(),
                    &group.counts,
                ))
                .map_err(encode_error)?;
        }
        summary
            .write_record(summary_row("total", &report.summary.totals))
            .map_err(encode_error)?;
        summary.flush().map_err(encode_error)?;

        Ok(())
    }
}
