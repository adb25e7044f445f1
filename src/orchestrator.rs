//! Orchestrator module - coordinates the export and update workflows
//!
//! This module provides:
//! - `Orchestrator`: runs manifest loading, lockfile listing, registry
//!   fetching and record aggregation for one project
//! - `ExportResult` / `UpdateResult`: the outcome of each command

use crate::config::Settings;
use crate::domain::{PackageRecord, ReportSummary, UpdateLevel};
use crate::error::AppError;
use crate::lockfile::{DependencyLister, NpmLsLister, PackageLockLister};
use crate::manifest::{ManifestWriter, PackageJson, WriteResult};
use crate::output::{write_report, Report, ReportFormat};
use crate::progress::Progress;
use crate::registry::{HttpClient, NpmRegistry, PackageRegistry, RegistryFetcher};
use crate::resolve::PackageInfoAggregator;
use crate::update::{UpdatePlan, UpdatePlanner};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Records for every declared dependency of one project
#[derive(Debug)]
pub struct Inspection {
    pub manifest: PackageJson,
    pub records: Vec<PackageRecord>,
    pub summary: ReportSummary,
}

impl Inspection {
    /// Number of records whose registry lookup failed
    pub fn fetch_failures(&self) -> usize {
        self.records.iter().filter(|r| r.fetch_error.is_some()).count()
    }
}

/// Result of the export command
#[derive(Debug)]
pub struct ExportResult {
    pub project: String,
    pub path: PathBuf,
    pub summary: ReportSummary,
    pub fetch_failures: usize,
}

/// Result of the update command
#[derive(Debug)]
pub struct UpdateResult {
    pub plan: UpdatePlan,
    pub write: WriteResult,
    pub summary: ReportSummary,
}

/// Options for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    pub force: bool,
}

/// Main orchestrator for pkgscout runs
pub struct Orchestrator<R = NpmRegistry> {
    settings: Settings,
    lister: Box<dyn DependencyLister>,
    fetcher: RegistryFetcher<R>,
    show_progress: bool,
}

impl Orchestrator<NpmRegistry> {
    /// Create an orchestrator talking to the configured npm registry
    pub fn new(settings: Settings, use_npm_ls: bool) -> Result<Self, AppError> {
        let client = HttpClient::from_settings(&settings)?;
        let registry = NpmRegistry::with_base_url(client, settings.registry.clone());
        let mut orchestrator = Self::with_registry(settings, registry);
        if use_npm_ls {
            orchestrator = orchestrator.with_lister(Box::new(NpmLsLister::new()));
        }
        Ok(orchestrator)
    }
}

impl<R: PackageRegistry> Orchestrator<R> {
    /// Create an orchestrator over any registry, reading package-lock.json
    pub fn with_registry(settings: Settings, registry: R) -> Self {
        let fetcher = RegistryFetcher::new(registry, settings.concurrency);
        Self {
            settings,
            lister: Box::new(PackageLockLister::new()),
            fetcher,
            show_progress: false,
        }
    }

    /// Replace the dependency lister
    pub fn with_lister(mut self, lister: Box<dyn DependencyLister>) -> Self {
        self.lister = lister;
        self
    }

    /// Show spinners and a progress bar on stderr
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn registry_base(&self) -> &str {
        self.fetcher.registry().base_url()
    }

    /// Build a record for every declared dependency
    ///
    /// Manifest and lockfile problems are fatal. Registry failures only
    /// degrade the affected records.
    pub async fn inspect(&self, project_dir: &Path) -> Result<Inspection, AppError> {
        let mut progress = Progress::new(self.show_progress);

        progress.spinner("Reading package.json...");
        let manifest = PackageJson::load(project_dir)?;
        let declarations = manifest.declarations();
        debug!(
            path = %manifest.path().display(),
            declared = declarations.len(),
            "manifest loaded"
        );

        progress.spinner("Reading installed versions...");
        let snapshot = self.lister.list(project_dir, &declarations).await?;
        progress.finish_and_clear();
        debug!(lister = self.lister.name(), locked = snapshot.len(), "installed versions listed");

        let names: Vec<&str> = declarations.iter().map(|d| d.registry_name()).collect();
        progress.start(names.len() as u64, "Fetching registry metadata");
        let bar = progress.handle();
        let results = self
            .fetcher
            .fetch_all_with(&names, |name| {
                if let Some(bar) = &bar {
                    bar.set_message(name.to_string());
                    bar.inc(1);
                }
            })
            .await;
        progress.finish_and_clear();

        let aggregator = PackageInfoAggregator::new(self.registry_base());
        let records: Vec<PackageRecord> = declarations
            .iter()
            .zip(&results)
            .map(|(declaration, result)| {
                aggregator.aggregate(
                    declaration,
                    snapshot.get(&declaration.package_name),
                    result.as_ref().map(|data| &**data),
                )
            })
            .collect();

        let summary = ReportSummary::from_records(&records);
        info!(
            project = %manifest.project_name(),
            packages = records.len(),
            outdated = summary.totals.outdated,
            failed = records.iter().filter(|r| r.fetch_error.is_some()).count(),
            "inspection complete"
        );

        Ok(Inspection {
            manifest,
            records,
            summary,
        })
    }

    /// Inspect the project and write a report file
    pub async fn export(
        &self,
        project_dir: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, AppError> {
        let inspection = self.inspect(project_dir).await?;
        let project = inspection.manifest.project_name();

        let report = Report {
            project: &project,
            project_version: inspection.manifest.version(),
            generated_at: Utc::now(),
            records: &inspection.records,
            summary: &inspection.summary,
        };
        let path = write_report(&report, options.format, &options.output_dir, options.force)?;

        let fetch_failures = inspection.fetch_failures();
        Ok(ExportResult {
            project,
            path,
            summary: inspection.summary,
            fetch_failures,
        })
    }

    /// Inspect the project, plan version bumps and apply them
    ///
    /// The manifest is rewritten once, after the whole plan is known.
    pub async fn update(
        &self,
        project_dir: &Path,
        level: UpdateLevel,
        dry_run: bool,
    ) -> Result<UpdateResult, AppError> {
        let mut inspection = self.inspect(project_dir).await?;

        let planner = UpdatePlanner::new(self.registry_base(), level);
        let plan = planner.plan(&inspection.records);
        debug!(
            planned = plan.entries.len(),
            skipped = plan.skipped.len(),
            %level,
            "update plan built"
        );

        let mut progress = Progress::new(self.show_progress && !dry_run && !plan.is_empty());
        progress.spinner("Writing package.json...");
        let write = ManifestWriter::new(dry_run).apply(&mut inspection.manifest, &plan.entries)?;
        progress.finish_and_clear();

        Ok(UpdateResult {
            plan,
            write,
            summary: inspection.summary,
        })
    }
}
