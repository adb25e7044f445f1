//! Text output for the terminal
//!
//! This module provides:
//! - Summary of a report run grouped by dependency type
//! - Update plan display with the semver tier of each change
//! - Skipped updates with reasons in verbose mode

use crate::domain::{ReportSummary, TierCounts, UpdatePlanEntry, UpdateStatus};
use crate::update::UpdatePlan;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbose: bool,
    color: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            color: true,
        }
    }

    /// Create a formatter with an explicit color setting
    pub fn with_color(verbose: bool, color: bool) -> Self {
        Self { verbose, color }
    }

    fn tier_label(&self, status: UpdateStatus) -> String {
        let label = status.label();
        if !self.color {
            return label.to_string();
        }
        match status {
            UpdateStatus::Major => label.red().bold().to_string(),
            UpdateStatus::Minor => label.yellow().to_string(),
            UpdateStatus::Patch => label.green().to_string(),
            UpdateStatus::UpToDate => label.dimmed().to_string(),
        }
    }

    fn counts_line(&self, counts: &TierCounts) -> String {
        let mut line = format!(
            "{} total, {} up to date, {} patch, {} minor, {} major",
            counts.total, counts.up_to_date, counts.patch, counts.minor, counts.major
        );
        if counts.unknown > 0 {
            line.push_str(&format!(", {} unknown", counts.unknown));
        }
        if counts.deprecated > 0 {
            let deprecated = format!("{} deprecated", counts.deprecated);
            line.push_str(", ");
            if self.color {
                line.push_str(&deprecated.magenta().to_string());
            } else {
                line.push_str(&deprecated);
            }
        }
        line
    }

    /// Write the report summary
    pub fn format_summary(
        &self,
        project: &str,
        summary: &ReportSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", project.bold())?;
        } else {
            writeln!(writer, "{}", project)?;
        }

        let name_width = summary
            .by_type
            .iter()
            .map(|g| g.dependency_type.manifest_key().len())
            .max()
            .unwrap_or(0);

        for group in &summary.by_type {
            writeln!(
                writer,
                "  {:width$}  {}",
                group.dependency_type.manifest_key(),
                self.counts_line(&group.counts),
                width = name_width
            )?;
        }

        let outdated = summary.totals.outdated;
        let headline = format!(
            "{} of {} dependencies can be updated",
            outdated, summary.totals.total
        );
        if self.color && outdated > 0 {
            writeln!(writer, "{}", headline.yellow())
        } else {
            writeln!(writer, "{}", headline)
        }
    }

    /// Write the location of a generated report
    pub fn format_report_written(&self, path: &Path, writer: &mut dyn Write) -> std::io::Result<()> {
        let path = path.display().to_string();
        if self.color {
            writeln!(writer, "{} {}", "Report written to".green(), path.bold())
        } else {
            writeln!(writer, "Report written to {}", path)
        }
    }

    fn format_entry(
        &self,
        entry: &UpdatePlanEntry,
        name_width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let dev_marker = if entry.dependency_type.is_dev() { " (dev)" } else { "" };
        if self.color {
            writeln!(
                writer,
                "  {:width$} {} {} {} [{}]{}",
                entry.package_name,
                entry.current_version_string.dimmed(),
                "→".dimmed(),
                entry.new_version_string.bright_white().bold(),
                self.tier_label(entry.update_type),
                dev_marker.dimmed(),
                width = name_width
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}",
                entry.package_name,
                entry.current_version_string,
                entry.new_version_string,
                entry.update_type.label(),
                dev_marker,
                width = name_width
            )
        }
    }

    /// Write an update plan
    pub fn format_plan(
        &self,
        plan: &UpdatePlan,
        dry_run: bool,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = match (dry_run, self.color) {
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
            (false, _) => String::new(),
        };

        if plan.entries.is_empty() {
            writeln!(writer, "{}All dependencies are up to date", prefix)?;
        } else {
            let count = plan.entries.len();
            let noun = if count == 1 { "update" } else { "updates" };
            let verb = if dry_run { "would be applied" } else { "applied" };
            writeln!(writer, "{}{} {} {}", prefix, count, noun, verb)?;

            let name_width = plan
                .entries
                .iter()
                .map(|e| e.package_name.len())
                .max()
                .unwrap_or(0)
                .max(20);
            for entry in &plan.entries {
                self.format_entry(entry, name_width, writer)?;
            }
        }

        if self.verbose && !plan.skipped.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "  {}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "  Skipped:")?;
            }
            for skipped in &plan.skipped {
                let line = format!("{} ({})", skipped.package_name, skipped.reason);
                if self.color {
                    writeln!(writer, "  {}", line.dimmed())?;
                } else {
                    writeln!(writer, "  {}", line)?;
                }
            }
        }

        Ok(())
    }
}
