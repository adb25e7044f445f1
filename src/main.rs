//! pkgscout - npm dependency inspector CLI tool
//!
//! Reports the update status of every dependency declared in package.json
//! and optionally bumps the declared versions.

use clap::Parser;
use pkgscout::cli::{CliArgs, Command};
use pkgscout::config::Settings;
use pkgscout::error::AppError;
use pkgscout::orchestrator::{ExportOptions, Orchestrator};
use pkgscout::output::TextFormatter;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code used when the run is interrupted with Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    tokio::select! {
        result = run(args) => match result {
            Ok(exit_code) => exit_code,
            Err(e) => {
                print_error(&e);
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

/// Logs go to stderr; RUST_LOG takes precedence over --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_error(error: &anyhow::Error) {
    eprintln!("Error: {}", error);
    if let Some(hint) = error.downcast_ref::<AppError>().and_then(AppError::hint) {
        eprintln!("hint: {}", hint);
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(args.cwd(), &args.overrides()).map_err(AppError::from)?;
    debug!(?settings, "settings resolved");

    let show_progress = !args.silent() && io::stderr().is_terminal();
    let orchestrator = Orchestrator::new(settings, args.use_npm_ls)?.with_progress(show_progress);
    let formatter = TextFormatter::new(args.verbose);

    match &args.command {
        Command::Export(export) => {
            let options = ExportOptions {
                output_dir: export.output_dir().to_path_buf(),
                format: export.format,
                force: export.force,
            };
            let result = orchestrator.export(&export.cwd, &options).await?;

            if !export.silent {
                let mut stdout = io::stdout().lock();
                formatter.format_summary(&result.project, &result.summary, &mut stdout)?;
                formatter.format_report_written(&result.path, &mut stdout)?;
                stdout.flush()?;
            }
        }
        Command::Update(update) => {
            let result = orchestrator
                .update(&update.cwd, update.level, update.dry_run)
                .await?;

            if !update.silent {
                let mut stdout = io::stdout().lock();
                formatter.format_plan(&result.plan, update.dry_run, &mut stdout)?;
                stdout.flush()?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
