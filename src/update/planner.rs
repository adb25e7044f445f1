//! Update planner
//!
//! Selects the records that qualify for a version bump at a requested level
//! and builds the new declared version strings.

use crate::domain::{
    PackageRecord, PackageVersionInfo, UpdateLevel, UpdatePlanEntry, UpdateStatus, VersionSpec,
};
use crate::resolve::{classify_update, is_registry_source};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Why an outdated record was left out of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The available update is beyond the requested level
    BeyondLevel,
    /// Installed from git, a tarball, a local path or another registry
    NonRegistrySource,
    /// The declared spec cannot be rewritten to a version
    UnsupportedSpec,
    /// The chosen target version is deprecated
    DeprecatedTarget,
    /// No target version exists for the requested level
    NoTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::BeyondLevel => "update is beyond the requested level",
            SkipReason::NonRegistrySource => "not installed from the registry",
            SkipReason::UnsupportedSpec => "declared spec is not a version range",
            SkipReason::DeprecatedTarget => "target version is deprecated",
            SkipReason::NoTarget => "no target version for the requested level",
        };
        write!(f, "{}", label)
    }
}

/// An outdated package the plan leaves alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedUpdate {
    pub package_name: String,
    pub reason: SkipReason,
}

/// Result of planning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    pub entries: Vec<UpdatePlanEntry>,
    pub skipped: Vec<SkippedUpdate>,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Plans updates against one registry
#[derive(Debug, Clone)]
pub struct UpdatePlanner {
    registry_base: String,
    level: UpdateLevel,
}

impl UpdatePlanner {
    pub fn new(registry_base: impl Into<String>, level: UpdateLevel) -> Self {
        Self {
            registry_base: registry_base.into(),
            level,
        }
    }

    /// Builds the plan for a set of records
    pub fn plan(&self, records: &[PackageRecord]) -> UpdatePlan {
        let mut plan = UpdatePlan::default();

        for record in records {
            match self.plan_record(record) {
                Ok(Some(entry)) => plan.entries.push(entry),
                Ok(None) => {}
                Err(reason) => {
                    debug!(package = %record.package_name, %reason, "update skipped");
                    plan.skipped.push(SkippedUpdate {
                        package_name: record.package_name.clone(),
                        reason,
                    });
                }
            }
        }

        plan
    }

    /// `Ok(None)` for records with nothing to update, `Err` for outdated
    /// records that do not qualify
    fn plan_record(&self, record: &PackageRecord) -> Result<Option<UpdatePlanEntry>, SkipReason> {
        let Some(installed) = record.installed.as_ref() else {
            return Ok(None);
        };
        let Some(status) = record.update_status else {
            return Ok(None);
        };
        if status == UpdateStatus::UpToDate {
            return Ok(None);
        }

        let within_level = match self.level {
            UpdateLevel::Latest => true,
            UpdateLevel::Minor => matches!(status, UpdateStatus::Minor | UpdateStatus::Patch),
            UpdateLevel::Patch => status == UpdateStatus::Patch,
        };
        if !within_level {
            return Err(SkipReason::BeyondLevel);
        }

        let from_registry = record
            .registry_source
            .as_deref()
            .is_some_and(|source| is_registry_source(source, &self.registry_base));
        if !from_registry {
            return Err(SkipReason::NonRegistrySource);
        }

        if !VersionSpec::parse(&record.version_required).is_registry_range() {
            return Err(SkipReason::UnsupportedSpec);
        }

        let target = self.target(record).ok_or(SkipReason::NoTarget)?;
        if target.deprecated {
            return Err(SkipReason::DeprecatedTarget);
        }

        let update_type = match classify_update(Some(&installed.version), Some(&target.version)) {
            Some(UpdateStatus::UpToDate) | None => return Ok(None),
            Some(tier) => tier,
        };

        Ok(Some(UpdatePlanEntry {
            package_name: record.package_name.clone(),
            dependency_type: record.dependency_type,
            current_version_string: record.version_required.clone(),
            new_version_string: new_version_string(&record.version_required, &target.version),
            update_type,
        }))
    }

    fn target<'r>(&self, record: &'r PackageRecord) -> Option<&'r PackageVersionInfo> {
        match self.level {
            UpdateLevel::Latest => record
                .latest
                .as_ref()
                .or(record.last_minor.as_ref())
                .or(record.last_patch.as_ref()),
            UpdateLevel::Minor => record.last_minor.as_ref().or(record.last_patch.as_ref()),
            UpdateLevel::Patch => record.last_patch.as_ref(),
        }
    }
}

/// Declared version string for `version`, keeping the `^` or `~` of `required`
pub fn new_version_string(required: &str, version: &str) -> String {
    format!("{}{}", VersionSpec::preserved_prefix(required), version)
}
