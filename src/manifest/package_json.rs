//! package.json model
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies
//!
//! The document is kept as a JSON value with key order preserved so that a
//! rewrite only changes the updated version strings.

use crate::domain::{DependencyDeclaration, DependencyType, UpdatePlanEntry};
use crate::error::ManifestError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Manifest file name
pub const MANIFEST_NAME: &str = "package.json";

/// A parsed package.json
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    document: Value,
}

impl PackageJson {
    /// Load `package.json` from a project directory
    pub fn load(project_dir: &Path) -> Result<Self, ManifestError> {
        let path = project_dir.join(MANIFEST_NAME);
        if !path.is_file() {
            return Err(ManifestError::not_found(path));
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ManifestError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        Self::parse(path, &content)
    }

    /// Parse manifest content read from `path`
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let document: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path.clone(), e.to_string()))?;
        if !document.is_object() {
            return Err(ManifestError::json_parse_error(
                path,
                "expected a JSON object at the top level",
            ));
        }
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Project name, if declared
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    /// Project version, if declared
    pub fn version(&self) -> Option<&str> {
        self.document.get("version").and_then(Value::as_str)
    }

    /// Name used for report files: the package name, else the directory name
    pub fn project_name(&self) -> String {
        self.name()
            .map(str::to_string)
            .or_else(|| {
                self.path
                    .parent()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "project".to_string())
    }

    /// Declared dependencies in manifest order, grouped by type
    pub fn declarations(&self) -> Vec<DependencyDeclaration> {
        let mut declarations = Vec::new();

        for &dependency_type in DependencyType::all() {
            let Some(section) = self
                .document
                .get(dependency_type.manifest_key())
                .and_then(Value::as_object)
            else {
                continue;
            };

            for (name, value) in section {
                match value.as_str() {
                    Some(required) => declarations.push(DependencyDeclaration::new(
                        name,
                        dependency_type,
                        required,
                    )),
                    None => warn!(
                        package = %name,
                        section = dependency_type.manifest_key(),
                        "ignoring non-string version"
                    ),
                }
            }
        }

        declarations
    }

    /// Replaces the declared version string for one plan entry
    pub fn set_version(&mut self, entry: &UpdatePlanEntry) -> Result<(), ManifestError> {
        let section_key = entry.dependency_type.manifest_key();
        let slot = self
            .document
            .get_mut(section_key)
            .and_then(Value::as_object_mut)
            .and_then(|section| section.get_mut(&entry.package_name))
            .ok_or_else(|| ManifestError::MissingDependency {
                package: entry.package_name.clone(),
                section: section_key.to_string(),
            })?;
        *slot = Value::String(entry.new_version_string.clone());
        Ok(())
    }

    /// Serialized document: 2-space indent with a trailing newline
    pub fn to_pretty_string(&self) -> Result<String, ManifestError> {
        let mut content = serde_json::to_string_pretty(&self.document)
            .map_err(|e| ManifestError::json_parse_error(self.path.clone(), e.to_string()))?;
        content.push('\n');
        Ok(content)
    }
}
