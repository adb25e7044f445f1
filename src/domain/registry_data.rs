//! Registry metadata payload for one package
//!
//! Only the fields the resolution core reads are typed; everything else a
//! registry returns on a version entry is kept in an `extra` bag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A `deprecated` notice, either a flag or a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Deprecation {
    Flag(bool),
    Message(String),
}

impl Deprecation {
    /// True for `true` or a non-empty message
    pub fn is_active(&self) -> bool {
        match self {
            Deprecation::Flag(flag) => *flag,
            Deprecation::Message(message) => !message.trim().is_empty(),
        }
    }
}

/// Metadata for one published version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryVersionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RegistryVersionMetadata {
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.as_ref().is_some_and(Deprecation::is_active)
    }
}

/// Raw registry document for one package name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryPackageData {
    #[serde(default)]
    pub versions: BTreeMap<String, RegistryVersionMetadata>,
    /// Publish timestamps keyed by version, plus `created` / `modified`
    #[serde(default)]
    pub time: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
}

impl RegistryPackageData {
    /// Returns true if the whole package carries a deprecation notice
    pub fn is_package_deprecated(&self) -> bool {
        self.deprecated.as_ref().is_some_and(Deprecation::is_active)
    }

    /// Version strings published to the registry
    pub fn version_keys(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Builder used by tests and fakes
    pub fn with_version(mut self, version: &str, published: Option<&str>) -> Self {
        self.versions
            .insert(version.to_string(), RegistryVersionMetadata::default());
        if let Some(published) = published {
            self.time.insert(version.to_string(), published.to_string());
        }
        self
    }

    pub fn with_deprecated_version(mut self, version: &str, message: &str) -> Self {
        self.versions.insert(
            version.to_string(),
            RegistryVersionMetadata {
                deprecated: Some(Deprecation::Message(message.to_string())),
                extra: serde_json::Map::new(),
            },
        );
        self
    }

    pub fn with_package_deprecated(mut self, deprecation: Deprecation) -> Self {
        self.deprecated = Some(deprecation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry_document() {
        let json = r#"{
            "name": "left-pad",
            "dist-tags": { "latest": "1.3.0" },
            "versions": {
                "1.0.0": { "name": "left-pad", "version": "1.0.0" },
                "1.3.0": { "name": "left-pad", "deprecated": "use String.prototype.padStart()" }
            },
            "time": {
                "created": "2014-03-14T00:00:00.000Z",
                "1.0.0": "2014-03-14T00:00:00.000Z",
                "1.3.0": "2018-04-09T00:00:00.000Z"
            }
        }"#;
        let data: RegistryPackageData = serde_json::from_str(json).unwrap();
        assert_eq!(data.versions.len(), 2);
        assert!(!data.versions["1.0.0"].is_deprecated());
        assert!(data.versions["1.3.0"].is_deprecated());
        assert_eq!(
            data.versions["1.0.0"].extra.get("version"),
            Some(&serde_json::Value::String("1.0.0".to_string()))
        );
        assert!(!data.is_package_deprecated());
        assert_eq!(data.time.get("created").map(String::as_str), Some("2014-03-14T00:00:00.000Z"));
    }

    #[test]
    fn test_missing_fields_default() {
        let data: RegistryPackageData = serde_json::from_str("{}").unwrap();
        assert!(data.versions.is_empty());
        assert!(data.time.is_empty());
        assert!(data.deprecated.is_none());
    }

    #[test]
    fn test_deprecation_truthiness() {
        assert!(Deprecation::Flag(true).is_active());
        assert!(!Deprecation::Flag(false).is_active());
        assert!(Deprecation::Message("gone".to_string()).is_active());
        assert!(!Deprecation::Message(String::new()).is_active());
    }

    #[test]
    fn test_package_level_flag() {
        let data: RegistryPackageData =
            serde_json::from_str(r#"{ "deprecated": true, "versions": {} }"#).unwrap();
        assert!(data.is_package_deprecated());
    }
}
