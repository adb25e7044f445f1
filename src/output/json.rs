//! JSON report
//!
//! This module provides:
//! - JSON serialization of package records through their report view
//! - Summary counts overall and per dependency type

use crate::domain::{RecordView, ReportSummary};
use crate::error::ReportError;
use crate::output::{Report, ReportEmitter};
use serde::Serialize;
use std::io::Write;

/// JSON report emitter
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReport;

impl JsonReport {
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    project: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    generated_at: String,
    summary: &'a ReportSummary,
    packages: Vec<RecordView<'a>>,
}

impl ReportEmitter for JsonReport {
    fn render(&self, report: &Report<'_>, writer: &mut dyn Write) -> Result<(), ReportError> {
        let output = JsonOutput {
            project: report.project,
            version: report.project_version,
            generated_at: report.generated_at.to_rfc3339(),
            summary: report.summary,
            packages: report.records.iter().map(|r| r.view()).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output).map_err(|e| {
            ReportError::EncodeError {
                message: e.to_string(),
            }
        })?;
        writeln!(writer).map_err(|e| ReportError::EncodeError {
            message: e.to_string(),
        })
    }
}
