//! CLI argument parsing module for pkgscout

use crate::config::SettingsOverrides;
use crate::domain::UpdateLevel;
use crate::output::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Parse a request window size; zero is rejected
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(value)
}

/// npm dependency inspector and updater
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pkgscout",
    version,
    about = "Inspect package.json dependencies against the npm registry"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Registry base URL (overrides pkgscout.toml and .npmrc)
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,

    /// Maximum number of concurrent registry requests
    #[arg(long, global = true, value_name = "N", value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Read installed versions from `npm ls` instead of package-lock.json
    #[arg(long, global = true)]
    pub use_npm_ls: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a dependency report
    Export(ExportArgs),
    /// Bump declared versions in package.json
    Update(UpdateArgs),
}

/// Options for `export`
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Project directory containing package.json
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Directory the report is written to (default: the project directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Suppress terminal output
    #[arg(short, long)]
    pub silent: bool,

    /// Overwrite an existing report
    #[arg(short, long)]
    pub force: bool,

    /// Report format; `excel` writes a CSV spreadsheet, `json` a JSON document
    #[arg(long, value_enum, default_value_t = ReportFormat::Excel)]
    pub format: ReportFormat,
}

impl ExportArgs {
    /// Directory the report lands in
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.cwd)
    }
}

/// Options for `update`
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Project directory containing package.json
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Suppress terminal output
    #[arg(short, long)]
    pub silent: bool,

    /// How far versions may move
    #[arg(short, long, value_enum, default_value_t = UpdateLevel::Latest)]
    pub level: UpdateLevel,

    /// Show what would change without writing package.json
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Project directory of the selected command
    pub fn cwd(&self) -> &Path {
        match &self.command {
            Command::Export(args) => &args.cwd,
            Command::Update(args) => &args.cwd,
        }
    }

    /// Whether terminal output is suppressed
    pub fn silent(&self) -> bool {
        match &self.command {
            Command::Export(args) => args.silent,
            Command::Update(args) => args.silent,
        }
    }

    /// Settings overrides carried by global flags
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            registry: self.registry.clone(),
            concurrency: self.concurrency,
        }
    }
}
