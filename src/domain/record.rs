//! Normalized per-package records produced by the resolution core

use super::{DependencyDeclaration, DependencyType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semver distance between the installed and the latest version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateStatus {
    UpToDate,
    Patch,
    Minor,
    Major,
}

impl UpdateStatus {
    /// Plain label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            UpdateStatus::UpToDate => "up-to-date",
            UpdateStatus::Patch => "patch",
            UpdateStatus::Minor => "minor",
            UpdateStatus::Major => "major",
        }
    }

    /// Label for an optional status; a missing comparison is "unknown"
    pub fn label_or_unknown(status: Option<UpdateStatus>) -> &'static str {
        status.map(|s| s.label()).unwrap_or("unknown")
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Public facts about one resolved version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersionInfo {
    pub version: String,
    /// Publish date as MM/DD/YYYY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub registry_url: String,
    pub deprecated: bool,
}

impl PackageVersionInfo {
    pub fn new(version: impl Into<String>, registry_url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            release_date: None,
            registry_url: registry_url.into(),
            deprecated: false,
        }
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }
}

/// Aggregated update information for one declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub package_name: String,
    pub dependency_type: DependencyType,
    pub version_required: String,
    pub installed: Option<PackageVersionInfo>,
    /// Highest patch within the installed major.minor
    pub last_patch: Option<PackageVersionInfo>,
    /// Highest minor within the installed major
    pub last_minor: Option<PackageVersionInfo>,
    /// Highest production version overall
    pub latest: Option<PackageVersionInfo>,
    pub registry_source: Option<String>,
    pub update_status: Option<UpdateStatus>,
    /// Registry failure for this package, if any
    pub fetch_error: Option<String>,
}

impl PackageRecord {
    /// Creates a record with only the declaration identity filled in
    pub fn from_declaration(declaration: &DependencyDeclaration) -> Self {
        Self {
            package_name: declaration.package_name.clone(),
            dependency_type: declaration.dependency_type,
            version_required: declaration.version_required.clone(),
            installed: None,
            last_patch: None,
            last_minor: None,
            latest: None,
            registry_source: None,
            update_status: None,
            fetch_error: None,
        }
    }

    /// Returns true if the installed version or the package is deprecated
    pub fn is_deprecated(&self) -> bool {
        self.installed.as_ref().is_some_and(|i| i.deprecated)
    }

    /// Returns true when a newer version exists
    pub fn is_outdated(&self) -> bool {
        matches!(
            self.update_status,
            Some(UpdateStatus::Patch | UpdateStatus::Minor | UpdateStatus::Major)
        )
    }

    /// Builds the serialized view used by report emitters
    pub fn view(&self) -> RecordView<'_> {
        let latest = self.latest.as_ref().filter(|latest| {
            let same_as = |other: &Option<PackageVersionInfo>| {
                other
                    .as_ref()
                    .is_some_and(|o| o.version == latest.version)
            };
            !same_as(&self.installed) && !same_as(&self.last_minor)
        });

        RecordView {
            package_name: &self.package_name,
            dependency_type: self.dependency_type,
            version_required: &self.version_required,
            installed: self.installed.as_ref(),
            last_patch: self.last_patch.as_ref(),
            last_minor: self.last_minor.as_ref(),
            latest,
            registry_source: self.registry_source.as_deref(),
            update_status: UpdateStatus::label_or_unknown(self.update_status),
            fetch_error: self.fetch_error.as_deref(),
        }
    }
}

/// Report view of a record
///
/// `latest` is omitted when it repeats `installed` or `last_minor`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView<'a> {
    pub package_name: &'a str,
    pub dependency_type: DependencyType,
    pub version_required: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed: Option<&'a PackageVersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_patch: Option<&'a PackageVersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_minor: Option<&'a PackageVersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<&'a PackageVersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_source: Option<&'a str>,
    pub update_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<&'a str>,
}
