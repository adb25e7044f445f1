//! Dependency declarations (package.json) and locked dependencies (lockfile)

use super::VersionSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The package.json section a dependency is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DependencyType {
    #[serde(rename = "dependencies")]
    Dependencies,
    #[serde(rename = "devDependencies")]
    DevDependencies,
    #[serde(rename = "peerDependencies")]
    PeerDependencies,
    #[serde(rename = "optionalDependencies")]
    OptionalDependencies,
}

impl DependencyType {
    /// Returns all dependency types in manifest order
    pub fn all() -> &'static [DependencyType] {
        &[
            DependencyType::Dependencies,
            DependencyType::DevDependencies,
            DependencyType::PeerDependencies,
            DependencyType::OptionalDependencies,
        ]
    }

    /// Returns the package.json key for this dependency type
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyType::Dependencies => "dependencies",
            DependencyType::DevDependencies => "devDependencies",
            DependencyType::PeerDependencies => "peerDependencies",
            DependencyType::OptionalDependencies => "optionalDependencies",
        }
    }

    /// Returns true for devDependencies
    pub fn is_dev(&self) -> bool {
        matches!(self, DependencyType::DevDependencies)
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.manifest_key())
    }
}

/// A dependency as written in package.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    /// Package name (key in the dependency map)
    pub package_name: String,
    /// Section the dependency was declared in
    pub dependency_type: DependencyType,
    /// Raw declared range or spec
    pub version_required: String,
}

impl DependencyDeclaration {
    /// Creates a new declaration
    pub fn new(
        package_name: impl Into<String>,
        dependency_type: DependencyType,
        version_required: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            dependency_type,
            version_required: version_required.into(),
        }
    }

    /// Parses the declared spec
    pub fn spec(&self) -> VersionSpec {
        VersionSpec::parse(&self.version_required)
    }

    /// Name to query at the registry
    ///
    /// `npm:` aliases are looked up under their target name.
    pub fn registry_name(&self) -> &str {
        match self.spec() {
            VersionSpec::Alias { .. } => {
                let target = self
                    .version_required
                    .strip_prefix("npm:")
                    .unwrap_or(&self.version_required);
                strip_alias_version(target)
            }
            _ => &self.package_name,
        }
    }
}

/// Strips a trailing `@range` from an alias target, keeping a leading scope `@`
pub(crate) fn strip_alias_version(target: &str) -> &str {
    let search_from = usize::from(target.starts_with('@'));
    match target[search_from..].find('@') {
        Some(idx) => &target[..search_from + idx],
        None => target,
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} [{}]",
            self.package_name, self.version_required, self.dependency_type
        )
    }
}

/// A dependency as resolved in the lockfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDependency {
    /// Package name
    pub package_name: String,
    /// Installed version
    pub resolved_version: String,
    /// URL or path the package was fetched from
    pub resolved_location: Option<String>,
}

impl LockedDependency {
    pub fn new(
        package_name: impl Into<String>,
        resolved_version: impl Into<String>,
        resolved_location: Option<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            resolved_version: resolved_version.into(),
            resolved_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_type_keys() {
        assert_eq!(DependencyType::Dependencies.manifest_key(), "dependencies");
        assert_eq!(
            DependencyType::DevDependencies.manifest_key(),
            "devDependencies"
        );
        assert_eq!(
            DependencyType::PeerDependencies.manifest_key(),
            "peerDependencies"
        );
        assert_eq!(
            DependencyType::OptionalDependencies.manifest_key(),
            "optionalDependencies"
        );
        assert_eq!(DependencyType::all().len(), 4);
    }

    #[test]
    fn test_dependency_type_serde() {
        let json = serde_json::to_string(&DependencyType::DevDependencies).unwrap();
        assert_eq!(json, "\"devDependencies\"");
        let parsed: DependencyType = serde_json::from_str("\"peerDependencies\"").unwrap();
        assert_eq!(parsed, DependencyType::PeerDependencies);
    }

    #[test]
    fn test_is_dev() {
        assert!(DependencyType::DevDependencies.is_dev());
        assert!(!DependencyType::Dependencies.is_dev());
    }

    #[test]
    fn test_registry_name_plain() {
        let decl = DependencyDeclaration::new("lodash", DependencyType::Dependencies, "^4.17.21");
        assert_eq!(decl.registry_name(), "lodash");
    }

    #[test]
    fn test_registry_name_alias() {
        let decl = DependencyDeclaration::new(
            "my-lodash",
            DependencyType::Dependencies,
            "npm:lodash@^4.17.21",
        );
        assert_eq!(decl.registry_name(), "lodash");
    }

    #[test]
    fn test_registry_name_scoped_alias() {
        let decl = DependencyDeclaration::new(
            "types",
            DependencyType::DevDependencies,
            "npm:@types/node@20.1.0",
        );
        assert_eq!(decl.registry_name(), "@types/node");
    }

    #[test]
    fn test_strip_alias_version() {
        assert_eq!(strip_alias_version("lodash"), "lodash");
        assert_eq!(strip_alias_version("lodash@4"), "lodash");
        assert_eq!(strip_alias_version("@scope/pkg"), "@scope/pkg");
        assert_eq!(strip_alias_version("@scope/pkg@^1.0.0"), "@scope/pkg");
    }

    #[test]
    fn test_declaration_display() {
        let decl = DependencyDeclaration::new("jest", DependencyType::DevDependencies, "^29.0.0");
        assert_eq!(decl.to_string(), "jest@^29.0.0 [devDependencies]");
    }
}
