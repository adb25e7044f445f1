//! Manifest write-back
//!
//! This module provides:
//! - ManifestWriter for applying an update plan to package.json
//! - Dry-run mode support (no file modifications)
//! - Atomic replacement of the file once every change is applied in memory

use super::PackageJson;
use crate::domain::UpdatePlanEntry;
use crate::error::ManifestError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Applies update plans to package.json
#[derive(Debug, Clone, Copy)]
pub struct ManifestWriter {
    dry_run: bool,
}

/// Result of applying a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub path: PathBuf,
    /// Number of version strings changed
    pub updates_applied: usize,
    /// Whether the file on disk was replaced
    pub file_modified: bool,
}

impl WriteResult {
    pub fn has_updates(&self) -> bool {
        self.updates_applied > 0
    }
}

impl ManifestWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn dry_run() -> Self {
        Self::new(true)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply every entry in memory, then write the manifest once
    ///
    /// Nothing is written if any entry fails or in dry-run mode.
    pub fn apply(
        &self,
        manifest: &mut PackageJson,
        entries: &[UpdatePlanEntry],
    ) -> Result<WriteResult, ManifestError> {
        for entry in entries {
            manifest.set_version(entry)?;
        }

        let mut result = WriteResult {
            path: manifest.path().to_path_buf(),
            updates_applied: entries.len(),
            file_modified: false,
        };

        if entries.is_empty() || self.dry_run {
            return Ok(result);
        }

        let content = manifest.to_pretty_string()?;
        write_atomic(manifest.path(), content.as_bytes())
            .map_err(|e| ManifestError::write_error(manifest.path(), e))?;
        result.file_modified = true;

        info!(
            path = %manifest.path().display(),
            updates = entries.len(),
            "manifest written"
        );

        Ok(result)
    }
}

/// Replace `path` with `contents` through a temporary sibling and a rename
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.pkgscout-tmp", file_name));

    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(())
}
