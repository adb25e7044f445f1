//! package-lock.json reader
//!
//! lockfileVersion 2 and 3 keep a flat `packages` map keyed by install path
//! (`node_modules/<name>`); the root entry `""` repeats the manifest's
//! dependency maps. lockfileVersion 1 only has a nested `dependencies` tree.

use super::{require_lockfile, DependencyLister, LockSnapshot};
use crate::domain::{DependencyDeclaration, DependencyType, LockedDependency};
use crate::error::LockfileError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// Reads installed versions from package-lock.json
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageLockLister;

impl PackageLockLister {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLock {
    #[serde(default)]
    lockfile_version: Option<u32>,
    #[serde(default)]
    packages: BTreeMap<String, PackageEntry>,
    #[serde(default)]
    dependencies: BTreeMap<String, LegacyEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageEntry {
    version: Option<String>,
    resolved: Option<String>,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    peer_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    optional_dependencies: BTreeMap<String, String>,
}

impl PackageEntry {
    fn declared(&self, dependency_type: DependencyType) -> &BTreeMap<String, String> {
        match dependency_type {
            DependencyType::Dependencies => &self.dependencies,
            DependencyType::DevDependencies => &self.dev_dependencies,
            DependencyType::PeerDependencies => &self.peer_dependencies,
            DependencyType::OptionalDependencies => &self.optional_dependencies,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    version: String,
    resolved: Option<String>,
}

#[async_trait]
impl DependencyLister for PackageLockLister {
    fn name(&self) -> &'static str {
        "package-lock.json"
    }

    async fn list(
        &self,
        project_dir: &Path,
        declarations: &[DependencyDeclaration],
    ) -> Result<LockSnapshot, LockfileError> {
        let path = require_lockfile(project_dir)?;
        let content = std::fs::read_to_string(&path).map_err(|e| LockfileError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        let lock: PackageLock = serde_json::from_str(&content)
            .map_err(|e| LockfileError::parse_error(path.clone(), e.to_string()))?;

        debug!(
            path = %path.display(),
            lockfile_version = ?lock.lockfile_version,
            "read lockfile"
        );

        parse_lock(&lock, declarations)
    }
}

fn parse_lock(
    lock: &PackageLock,
    declarations: &[DependencyDeclaration],
) -> Result<LockSnapshot, LockfileError> {
    if lock.packages.is_empty() {
        return Ok(from_legacy(lock, declarations));
    }

    if let Some(root) = lock.packages.get("") {
        let mismatches = find_mismatches(root, declarations);
        if !mismatches.is_empty() {
            return Err(LockfileError::VersionMismatch { mismatches });
        }
    }

    Ok(declarations
        .iter()
        .filter_map(|declaration| {
            let name = &declaration.package_name;
            let entry = lock.packages.get(&format!("node_modules/{}", name))?;
            locked_from_entry(name, entry, &lock.packages)
        })
        .collect())
}

/// Compares the root entry's dependency maps against the manifest
fn find_mismatches(root: &PackageEntry, declarations: &[DependencyDeclaration]) -> Vec<String> {
    let mut mismatches = Vec::new();

    for &dependency_type in DependencyType::all() {
        let locked = root.declared(dependency_type);
        let declared: HashMap<&str, &str> = declarations
            .iter()
            .filter(|d| d.dependency_type == dependency_type)
            .map(|d| (d.package_name.as_str(), d.version_required.as_str()))
            .collect();

        for (name, required) in &declared {
            match locked.get(*name) {
                Some(range) if range.as_str() == *required => {}
                Some(range) => mismatches.push(format!(
                    "{} ({}): package.json wants {}, lockfile has {}",
                    name, dependency_type, required, range
                )),
                None => mismatches.push(format!(
                    "{} ({}): not in lockfile",
                    name, dependency_type
                )),
            }
        }

        for name in locked.keys() {
            if !declared.contains_key(name.as_str()) {
                mismatches.push(format!(
                    "{} ({}): in lockfile but not in package.json",
                    name, dependency_type
                ));
            }
        }
    }

    mismatches.sort();
    mismatches
}

fn locked_from_entry(
    name: &str,
    entry: &PackageEntry,
    packages: &BTreeMap<String, PackageEntry>,
) -> Option<LockedDependency> {
    if entry.link {
        // Links point at another entry keyed by its relative path
        let target_path = entry.resolved.as_deref()?;
        let version = packages.get(target_path)?.version.clone()?;
        return Some(LockedDependency::new(
            name,
            version,
            Some(format!("file:{}", target_path)),
        ));
    }

    let version = entry.version.clone()?;
    Some(LockedDependency::new(name, version, entry.resolved.clone()))
}

fn from_legacy(lock: &PackageLock, declarations: &[DependencyDeclaration]) -> LockSnapshot {
    declarations
        .iter()
        .filter_map(|declaration| {
            let entry = lock.dependencies.get(&declaration.package_name)?;
            // v1 records git and file installs as the version itself
            let location = entry.resolved.clone().or_else(|| {
                let version = entry.version.as_str();
                (version.contains(':') || version.contains('/')).then(|| version.to_string())
            });
            Some(LockedDependency::new(
                &declaration.package_name,
                &entry.version,
                location,
            ))
        })
        .collect()
}
