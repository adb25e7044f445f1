//! Package info aggregator
//!
//! Combines a declaration, its lockfile entry and the registry document into
//! one [`PackageRecord`]. No I/O happens here.

use super::classifier::classify_update;
use super::deprecation::is_deprecated;
use super::selector::select_versions;
use super::source::classify_source;
use crate::domain::{
    DependencyDeclaration, LockedDependency, PackageRecord, PackageVersionInfo,
    RegistryPackageData,
};
use crate::error::RegistryError;
use chrono::{DateTime, NaiveDate};
use tracing::debug;

/// Date format used in reports
const RELEASE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Builds package records against one registry
#[derive(Debug, Clone)]
pub struct PackageInfoAggregator {
    registry_base: String,
}

impl PackageInfoAggregator {
    /// Create an aggregator for a registry base URL
    pub fn new(registry_base: impl Into<String>) -> Self {
        let registry_base = registry_base.into().trim_end_matches('/').to_string();
        Self { registry_base }
    }

    pub fn registry_base(&self) -> &str {
        &self.registry_base
    }

    /// Builds the record for one declaration
    ///
    /// A failed registry lookup yields a record without version fields whose
    /// `fetch_error` carries the failure.
    pub fn aggregate(
        &self,
        declaration: &DependencyDeclaration,
        locked: Option<&LockedDependency>,
        registry: Result<&RegistryPackageData, &RegistryError>,
    ) -> PackageRecord {
        let mut record = PackageRecord::from_declaration(declaration);
        record.registry_source = classify_source(
            locked.and_then(|l| l.resolved_location.as_deref()),
            &self.registry_base,
        );

        let data = match registry {
            Ok(data) => data,
            Err(error) => {
                debug!(package = %declaration.package_name, %error, "registry data unavailable");
                record.fetch_error = Some(error.to_string());
                return record;
            }
        };

        let registry_name = declaration.registry_name();
        let info = |version: &str| self.version_info(registry_name, version, data);

        let installed = locked.map(|l| l.resolved_version.as_str());
        let selection = select_versions(installed, data.version_keys());

        record.installed = installed.map(&info);
        record.last_patch = selection.last_patch.as_deref().map(&info);
        record.last_minor = selection.last_minor.as_deref().map(&info);
        record.latest = selection.latest.as_deref().map(&info);
        record.update_status = classify_update(installed, selection.latest.as_deref());

        if record.update_status.is_none() {
            debug!(
                package = %declaration.package_name,
                installed = ?installed,
                "update status unknown"
            );
        }

        record
    }

    fn version_info(
        &self,
        registry_name: &str,
        version: &str,
        data: &RegistryPackageData,
    ) -> PackageVersionInfo {
        let url = format!("{}/{}/{}", self.registry_base, registry_name, version);
        let mut info = PackageVersionInfo::new(version, url)
            .with_deprecated(is_deprecated(Some(data), version));
        if let Some(date) = data.time.get(version).and_then(|t| format_release_date(t)) {
            info = info.with_release_date(date);
        }
        info
    }
}

/// Formats an ISO 8601 timestamp as MM/DD/YYYY
fn format_release_date(timestamp: &str) -> Option<String> {
    let date = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.date_naive(),
        Err(_) => NaiveDate::parse_from_str(timestamp.get(..10)?, "%Y-%m-%d").ok()?,
    };
    Some(date.format(RELEASE_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Deprecation, DependencyType, UpdateStatus};

    const BASE: &str = "https://registry.example";

    fn declaration(name: &str, required: &str) -> DependencyDeclaration {
        DependencyDeclaration::new(name, DependencyType::Dependencies, required)
    }

    fn locked(name: &str, version: &str) -> LockedDependency {
        LockedDependency::new(
            name,
            version,
            Some(format!("{BASE}/{name}/-/{name}-{version}.tgz")),
        )
    }

    fn registry(versions: &[&str]) -> RegistryPackageData {
        versions.iter().fold(RegistryPackageData::default(), |data, v| {
            data.with_version(v, Some("2023-05-17T08:30:00.000Z"))
        })
    }

    #[test]
    fn test_aggregate_all_tiers() {
        let aggregator = PackageInfoAggregator::new(BASE);
        let data = registry(&["1.2.3", "1.2.4", "1.3.0", "2.0.0"]);
        let record = aggregator.aggregate(
            &declaration("pkg", "^1.2.3"),
            Some(&locked("pkg", "1.2.3")),
            Ok(&data),
        );

        assert_eq!(record.installed.as_ref().unwrap().version, "1.2.3");
        assert_eq!(record.last_patch.as_ref().unwrap().version, "1.2.4");
        assert_eq!(record.last_minor.as_ref().unwrap().version, "1.3.0");
        assert_eq!(record.latest.as_ref().unwrap().version, "2.0.0");
        assert_eq!(record.update_status, Some(UpdateStatus::Major));
        assert_eq!(record.registry_source.as_deref(), Some("https://registry.example/pkg"));
        assert!(record.fetch_error.is_none());
    }

    #[test]
    fn test_aggregate_up_to_date() {
        let aggregator = PackageInfoAggregator::new(BASE);
        let data = registry(&["2.0.0"]);
        let record = aggregator.aggregate(
            &declaration("pkg", "^2.0.0"),
            Some(&locked("pkg", "2.0.0")),
            Ok(&data),
        );
        assert!(record.last_patch.is_none());
        assert!(record.last_minor.is_none());
        assert_eq!(record.latest.as_ref().unwrap().version, "2.0.0");
        assert_eq!(record.update_status, Some(UpdateStatus::UpToDate));
    }

    #[test]
    fn test_version_info_fields() {
        let aggregator = PackageInfoAggregator::new(format!("{BASE}/"));
        let data = registry(&["1.0.0"]);
        let record = aggregator.aggregate(
            &declaration("pkg", "1.0.0"),
            Some(&locked("pkg", "1.0.0")),
            Ok(&data),
        );
        let installed = record.installed.unwrap();
        assert_eq!(installed.release_date.as_deref(), Some("05/17/2023"));
        assert_eq!(installed.registry_url, "https://registry.example/pkg/1.0.0");
        assert!(!installed.deprecated);
    }

    #[test]
    fn test_alias_uses_target_name_for_urls() {
        let aggregator = PackageInfoAggregator::new(BASE);
        let data = registry(&["4.2.3"]);
        let lock = LockedDependency::new(
            "sw",
            "4.2.3",
            Some(format!("{BASE}/string-width/-/string-width-4.2.3.tgz")),
        );
        let record = aggregator.aggregate(
            &declaration("sw", "npm:string-width@^4.2.0"),
            Some(&lock),
            Ok(&data),
        );
        assert_eq!(
            record.installed.unwrap().registry_url,
            "https://registry.example/string-width/4.2.3"
        );
        assert_eq!(
            record.registry_source.as_deref(),
            Some("https://registry.example/string-width")
        );
    }

    #[test]
    fn test_deprecated_package_marks_installed() {
        let aggregator = PackageInfoAggregator::new(BASE);
        let data = registry(&["1.0.0", "1.1.0"])
            .with_package_deprecated(Deprecation::Message("no longer maintained".into()));
        let record = aggregator.aggregate(
            &declaration("pkg", "^1.0.0"),
            Some(&locked("pkg", "1.0.0")),
            Ok(&data),
        );
        assert!(record.is_deprecated());
        assert!(record.last_minor.unwrap().deprecated);
    }

    #[test]
    fn test_missing_lock_entry_keeps_latest() {
        let aggregator = PackageInfoAggregator::new(BASE);
        let data = registry(&["1.0.0", "1.4.0"]);
        let record = aggregator.aggregate(&declaration("pkg", "^1.0.0"), None, Ok(&data));
        assert!(record.installed.is_none());
        assert!(record.last_patch.is_none());
        assert!(record.last_minor.is_none());
        assert_eq!(record.latest.unwrap().version, "1.4.0");
        assert!(record.update_status.is_none());
        assert!(record.registry_source.is_none());
    }

    #[test]
    fn test_unparseable_installed_is_unknown() {
        let aggregator = PackageInfoAggregator::new(BASE);
        let data = registry(&["1.0.0"]);
        let lock = LockedDependency::new("pkg", "1.0.0-beta.2", None);
        let record = aggregator.aggregate(&declaration("pkg", "^1.0.0-beta"), Some(&lock), Ok(&data));
        assert_eq!(record.installed.unwrap().version, "1.0.0-beta.2");
        assert!(record.latest.is_none());
        assert!(record.update_status.is_none());
    }

    #[test]
    fn test_fetch_failure_degrades_record() {
        let aggregator = PackageInfoAggregator::new(BASE);
        let error = RegistryError::package_not_found("ghost", "npm");
        let record = aggregator.aggregate(
            &declaration("ghost", "^1.0.0"),
            Some(&locked("ghost", "1.0.0")),
            Err(&error),
        );
        assert!(record.installed.is_none());
        assert!(record.latest.is_none());
        assert!(record.update_status.is_none());
        assert_eq!(record.registry_source.as_deref(), Some("https://registry.example/ghost"));
        assert!(record.fetch_error.unwrap().contains("ghost"));
    }

    #[test]
    fn test_format_release_date() {
        assert_eq!(
            format_release_date("2021-02-20T15:00:11.125Z").as_deref(),
            Some("02/20/2021")
        );
        assert_eq!(format_release_date("2021-02-20").as_deref(), Some("02/20/2021"));
        assert_eq!(format_release_date("yesterday"), None);
    }
}
