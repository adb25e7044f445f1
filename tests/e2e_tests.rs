//! End-to-end tests for the pkgscout CLI
//!
//! These tests verify:
//! - Fatal manifest and lockfile problems exit with 1 and a hint
//! - Export writes a report even when the registry is unreachable
//! - Dry-run mode leaves package.json unchanged
//! - Existing reports are only replaced with --force
//!
//! The registry points at a closed local port so no test touches the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PACKAGE_JSON: &str = r#"{
  "name": "e2e-project",
  "version": "1.0.0",
  "dependencies": {
    "lodash": "^4.17.21"
  },
  "devDependencies": {
    "typescript": "~5.0.0"
  }
}
"#;

const PACKAGE_LOCK: &str = r#"{
  "name": "e2e-project",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "requires": true,
  "packages": {
    "": {
      "name": "e2e-project",
      "version": "1.0.0",
      "dependencies": { "lodash": "^4.17.21" },
      "devDependencies": { "typescript": "~5.0.0" }
    },
    "node_modules/lodash": {
      "version": "4.17.21",
      "resolved": "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz"
    },
    "node_modules/typescript": {
      "version": "5.0.4",
      "resolved": "https://registry.npmjs.org/typescript/-/typescript-5.0.4.tgz",
      "dev": true
    }
  }
}
"#;

const CONFIG: &str = r#"[registry]
url = "http://127.0.0.1:9"
retries = 0
timeout_secs = 5
"#;

fn pkgscout() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pkgscout"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Create a project with a manifest, an optional lockfile and an offline config
fn create_test_project(manifest: &str, lock: Option<&str>) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("package.json"), manifest).unwrap();
    if let Some(lock) = lock {
        fs::write(temp_dir.path().join("package-lock.json"), lock).unwrap();
    }
    fs::write(temp_dir.path().join("pkgscout.toml"), CONFIG).unwrap();
    temp_dir
}

mod fatal_errors {
    use super::*;

    #[test]
    fn test_missing_lockfile() {
        let temp_dir = create_test_project(PACKAGE_JSON, None);

        pkgscout()
            .arg("export")
            .arg("--cwd")
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error: lockfile not found"))
            .stderr(predicate::str::contains("hint: run `npm install`"));
    }

    #[test]
    fn test_invalid_manifest_json() {
        let temp_dir = create_test_project("{ \"name\": ", Some(PACKAGE_LOCK));

        pkgscout()
            .arg("export")
            .arg("--cwd")
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("hint: fix the JSON syntax"));
    }

    #[test]
    fn test_missing_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();

        pkgscout()
            .arg("update")
            .arg("--cwd")
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("manifest file not found"));
    }

    #[test]
    fn test_lockfile_out_of_sync() {
        let stale_lock = PACKAGE_LOCK.replace(
            r#""dependencies": { "lodash": "^4.17.21" }"#,
            r#""dependencies": { "lodash": "^4.17.0" }"#,
        );
        let temp_dir = create_test_project(PACKAGE_JSON, Some(&stale_lock));

        pkgscout()
            .arg("update")
            .arg("--cwd")
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("out of sync"))
            .stderr(predicate::str::contains("hint: regenerate the lockfile"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let temp_dir = create_test_project(PACKAGE_JSON, Some(PACKAGE_LOCK));

        pkgscout()
            .args(["export", "--concurrency", "0", "--cwd"])
            .arg(temp_dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("concurrency must be at least 1"));
    }
}

mod export_command {
    use super::*;

    #[test]
    fn test_export_with_unreachable_registry() {
        let temp_dir = create_test_project(PACKAGE_JSON, Some(PACKAGE_LOCK));

        pkgscout()
            .args(["export", "--format", "json", "--cwd"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("e2e-project"))
            .stdout(predicate::str::contains("Report written to"));

        let report_path = temp_dir.path().join("e2e-project-dependencies.json");
        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(report["project"], "e2e-project");
        let packages = report["packages"].as_array().unwrap();
        assert_eq!(packages.len(), 2);
    }

    #[test]
    fn test_export_csv_to_output_dir() {
        let temp_dir = create_test_project(PACKAGE_JSON, Some(PACKAGE_LOCK));
        let output_dir = temp_dir.path().join("out");

        pkgscout()
            .args(["export", "--silent", "--cwd"])
            .arg(temp_dir.path())
            .arg("--output-dir")
            .arg(&output_dir)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let csv = fs::read_to_string(output_dir.join("e2e-project-dependencies.csv")).unwrap();
        assert!(csv.contains("lodash"));
        assert!(csv.contains("typescript"));
    }

    #[test]
    fn test_silent_export_hides_registry_failures() {
        let temp_dir = create_test_project(PACKAGE_JSON, Some(PACKAGE_LOCK));

        pkgscout()
            .args(["export", "--silent", "--format", "json", "--cwd"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty());

        let report =
            fs::read_to_string(temp_dir.path().join("e2e-project-dependencies.json")).unwrap();
        assert!(report.contains("fetchError"));
    }

    #[test]
    fn test_existing_report_requires_force() {
        let temp_dir = create_test_project(PACKAGE_JSON, Some(PACKAGE_LOCK));
        let report_path = temp_dir.path().join("e2e-project-dependencies.csv");
        fs::write(&report_path, "old report").unwrap();

        pkgscout()
            .args(["export", "--cwd"])
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("hint: pass --force"));
        assert_eq!(fs::read_to_string(&report_path).unwrap(), "old report");

        pkgscout()
            .args(["export", "--force", "--silent", "--cwd"])
            .arg(temp_dir.path())
            .assert()
            .success();
        assert_ne!(fs::read_to_string(&report_path).unwrap(), "old report");
    }
}

mod update_command {
    use super::*;

    #[test]
    fn test_dry_run_leaves_manifest_unchanged() {
        let temp_dir = create_test_project(PACKAGE_JSON, Some(PACKAGE_LOCK));

        pkgscout()
            .args(["update", "--dry-run", "--level", "minor", "--cwd"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("(dry-run)"));

        let manifest = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        assert_eq!(manifest, PACKAGE_JSON);
    }

    #[test]
    fn test_nothing_to_update_exits_zero() {
        let temp_dir = create_test_project(PACKAGE_JSON, Some(PACKAGE_LOCK));

        pkgscout()
            .args(["update", "--cwd"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("All dependencies are up to date"));

        let manifest = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        assert_eq!(manifest, PACKAGE_JSON);
    }
}
