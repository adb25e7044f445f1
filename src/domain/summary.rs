//! Aggregate counts over package records
//!
//! Provides totals overall and grouped by dependency type.

use super::{DependencyType, PackageRecord, UpdateStatus};
use serde::{Deserialize, Serialize};

/// Per-tier counts for a group of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub total: usize,
    pub up_to_date: usize,
    pub patch: usize,
    pub minor: usize,
    pub major: usize,
    pub unknown: usize,
    pub deprecated: usize,
    /// Records with a patch, minor or major update available
    pub outdated: usize,
}

impl TierCounts {
    /// Adds one record to the counts
    pub fn add(&mut self, record: &PackageRecord) {
        self.total += 1;
        match record.update_status {
            Some(UpdateStatus::UpToDate) => self.up_to_date += 1,
            Some(UpdateStatus::Patch) => self.patch += 1,
            Some(UpdateStatus::Minor) => self.minor += 1,
            Some(UpdateStatus::Major) => self.major += 1,
            None => self.unknown += 1,
        }
        if record.is_deprecated() {
            self.deprecated += 1;
        }
        if record.is_outdated() {
            self.outdated += 1;
        }
    }
}

/// Summary of one dependency type group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    pub dependency_type: DependencyType,
    #[serde(flatten)]
    pub counts: TierCounts,
}

/// Overall summary of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(flatten)]
    pub totals: TierCounts,
    /// Groups in manifest order; empty groups are omitted
    pub by_type: Vec<TypeSummary>,
}

impl ReportSummary {
    /// Builds the summary from a record list
    pub fn from_records(records: &[PackageRecord]) -> Self {
        let mut totals = TierCounts::default();
        let mut by_type = Vec::new();

        for dependency_type in DependencyType::all() {
            let mut counts = TierCounts::default();
            for record in records.iter().filter(|r| r.dependency_type == *dependency_type) {
                counts.add(record);
                totals.add(record);
            }
            if counts.total > 0 {
                by_type.push(TypeSummary {
                    dependency_type: *dependency_type,
                    counts,
                });
            }
        }

        Self { totals, by_type }
    }

    /// Returns the group for a dependency type
    pub fn group(&self, dependency_type: DependencyType) -> Option<&TierCounts> {
        self.by_type
            .iter()
            .find(|g| g.dependency_type == dependency_type)
            .map(|g| &g.counts)
    }
}
