//! `npm ls --json` runner
//!
//! Asks npm for the installed top-level tree instead of reading the
//! lockfile directly. npm flags entries that do not satisfy package.json
//! with `invalid`; those make the listing fail.

use super::{require_lockfile, DependencyLister, LockSnapshot};
use crate::domain::{DependencyDeclaration, LockedDependency};
use crate::error::LockfileError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Lists installed dependencies by running npm
#[derive(Debug, Clone)]
pub struct NpmLsLister {
    program: String,
}

impl Default for NpmLsLister {
    fn default() -> Self {
        Self::new()
    }
}

impl NpmLsLister {
    pub fn new() -> Self {
        Self {
            program: "npm".to_string(),
        }
    }

    /// Use a different npm executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct NpmLsOutput {
    #[serde(default)]
    dependencies: BTreeMap<String, NpmLsEntry>,
}

#[derive(Debug, Deserialize)]
struct NpmLsEntry {
    version: Option<String>,
    resolved: Option<String>,
    /// `true` or a message such as `"^2.0.0" from the root project`
    #[serde(default)]
    invalid: Option<serde_json::Value>,
    #[serde(default)]
    missing: bool,
}

impl NpmLsEntry {
    fn invalid_reason(&self) -> Option<String> {
        match self.invalid.as_ref()? {
            serde_json::Value::Bool(false) | serde_json::Value::Null => None,
            serde_json::Value::String(message) => Some(message.clone()),
            _ => Some("does not satisfy package.json".to_string()),
        }
    }
}

#[async_trait]
impl DependencyLister for NpmLsLister {
    fn name(&self) -> &'static str {
        "npm ls"
    }

    async fn list(
        &self,
        project_dir: &Path,
        declarations: &[DependencyDeclaration],
    ) -> Result<LockSnapshot, LockfileError> {
        require_lockfile(project_dir)?;

        debug!(program = %self.program, dir = %project_dir.display(), "running npm ls");
        let output = Command::new(&self.program)
            .args(["ls", "--json", "--depth=0"])
            .current_dir(project_dir)
            .output()
            .await
            .map_err(|e| {
                LockfileError::lister_failed(format!("failed to run {}: {}", self.program, e))
            })?;

        // npm ls exits non-zero whenever it reports problems; the JSON is
        // still printed, so only an unreadable stdout is a failure
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LockfileError::lister_failed(format!(
                "{} ls produced no output: {}",
                self.program,
                stderr.trim()
            )));
        }

        parse_npm_ls(&stdout, declarations)
    }
}

/// Parses `npm ls --json` output for the declared dependencies
fn parse_npm_ls(
    stdout: &str,
    declarations: &[DependencyDeclaration],
) -> Result<LockSnapshot, LockfileError> {
    let parsed: NpmLsOutput = serde_json::from_str(stdout)
        .map_err(|e| LockfileError::lister_failed(format!("unreadable npm ls output: {}", e)))?;

    let mut mismatches: Vec<String> = parsed
        .dependencies
        .iter()
        .filter_map(|(name, entry)| {
            entry
                .invalid_reason()
                .map(|reason| format!("{}: {}", name, reason))
        })
        .collect();
    if !mismatches.is_empty() {
        mismatches.sort();
        return Err(LockfileError::VersionMismatch { mismatches });
    }

    Ok(declarations
        .iter()
        .filter_map(|declaration| {
            let name = &declaration.package_name;
            let entry = parsed.dependencies.get(name)?;
            if entry.missing {
                debug!(package = %name, "not installed");
                return None;
            }
            let version = entry.version.clone()?;
            Some(LockedDependency::new(name, version, entry.resolved.clone()))
        })
        .collect())
}
