//! Lockfile-equivalent dependency listing
//!
//! This module provides:
//! - The `DependencyLister` seam over installed-version sources
//! - `package-lock.json` reader (lockfileVersion 1, 2 and 3)
//! - `npm ls --json` runner
//!
//! Both listers refuse to run without a lockfile and fail when the lockfile
//! disagrees with the manifest.

mod npm_ls;
mod package_lock;

pub use npm_ls::NpmLsLister;
pub use package_lock::PackageLockLister;

use crate::domain::{DependencyDeclaration, LockedDependency};
use crate::error::LockfileError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lockfile name npm writes next to package.json
pub const LOCKFILE_NAME: &str = "package-lock.json";

/// Installed versions keyed by declared package name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockSnapshot {
    entries: HashMap<String, LockedDependency>,
}

impl LockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locked: LockedDependency) {
        self.entries.insert(locked.package_name.clone(), locked);
    }

    pub fn get(&self, package_name: &str) -> Option<&LockedDependency> {
        self.entries.get(package_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<LockedDependency> for LockSnapshot {
    fn from_iter<I: IntoIterator<Item = LockedDependency>>(iter: I) -> Self {
        let mut snapshot = LockSnapshot::new();
        for locked in iter {
            snapshot.insert(locked);
        }
        snapshot
    }
}

/// Source of installed versions for a project
#[async_trait]
pub trait DependencyLister: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Lists installed versions for the declared dependencies
    ///
    /// Fails when no lockfile exists or when it is out of sync with the
    /// declarations.
    async fn list(
        &self,
        project_dir: &Path,
        declarations: &[DependencyDeclaration],
    ) -> Result<LockSnapshot, LockfileError>;
}

/// Path of the lockfile, or `NotFound`
pub(crate) fn require_lockfile(project_dir: &Path) -> Result<PathBuf, LockfileError> {
    let path = project_dir.join(LOCKFILE_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(LockfileError::NotFound {
            dir: project_dir.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_lookup() {
        let snapshot: LockSnapshot = [
            LockedDependency::new("a", "1.0.0", None),
            LockedDependency::new("b", "2.0.0", None),
        ]
        .into_iter()
        .collect();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("b").unwrap().resolved_version, "2.0.0");
        assert!(snapshot.get("c").is_none());
    }

    #[test]
    fn test_require_lockfile() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            require_lockfile(dir.path()),
            Err(LockfileError::NotFound { .. })
        ));
        std::fs::write(dir.path().join(LOCKFILE_NAME), "{}").unwrap();
        assert!(require_lockfile(dir.path()).is_ok());
    }
}
