//! Deprecation resolver

use crate::domain::RegistryPackageData;

/// Returns true if `version` of the package is deprecated
///
/// A package-level notice marks every version. Missing data is never
/// deprecated.
pub fn is_deprecated(data: Option<&RegistryPackageData>, version: &str) -> bool {
    let Some(data) = data else {
        return false;
    };

    if data.is_package_deprecated() {
        return true;
    }

    data.versions
        .get(version)
        .is_some_and(|metadata| metadata.is_deprecated())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Deprecation;

    #[test]
    fn test_version_level_notice() {
        let data = RegistryPackageData::default()
            .with_version("1.0.0", None)
            .with_deprecated_version("1.1.0", "critical bug, use 1.1.1");
        assert!(!is_deprecated(Some(&data), "1.0.0"));
        assert!(is_deprecated(Some(&data), "1.1.0"));
    }

    #[test]
    fn test_package_level_notice_marks_every_version() {
        let data = RegistryPackageData::default()
            .with_version("1.0.0", None)
            .with_version("2.0.0", None)
            .with_package_deprecated(Deprecation::Flag(true));
        assert!(is_deprecated(Some(&data), "1.0.0"));
        assert!(is_deprecated(Some(&data), "2.0.0"));
        assert!(is_deprecated(Some(&data), "9.9.9"));
    }

    #[test]
    fn test_empty_notice_is_not_deprecated() {
        let data = RegistryPackageData::default()
            .with_deprecated_version("1.0.0", "")
            .with_package_deprecated(Deprecation::Flag(false));
        assert!(!is_deprecated(Some(&data), "1.0.0"));
    }

    #[test]
    fn test_missing_data() {
        assert!(!is_deprecated(None, "1.0.0"));
        let data = RegistryPackageData::default();
        assert!(!is_deprecated(Some(&data), "1.0.0"));
    }
}
