//! tfdocs-action CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success, or nothing to commit
//! - 1: Uncommitted changes with fail-on-diff, or a general error
//! - N: Exit code of the failing terraform-docs or git command

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tfdocs_core::{annotate, AnnotationLevel, CoreError};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.globals.verbose);

    let result = match cli.command {
        None => commands::run::execute(&cli.globals, Default::default()).await,
        Some(Commands::Run(args)) => commands::run::execute(&cli.globals, args).await,
        Some(Commands::Plan(args)) => commands::plan::execute(&cli.globals, args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            if std::env::var_os("CI").is_some() {
                annotate(AnnotationLevel::Error, &format!("{:#}", e));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Debug output is enabled by `-v` or by re-running a CI job with debug logging.
fn init_logging(verbose: bool) {
    let debug = verbose || std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let default_filter = if debug { "tfdocs=debug,warn" } else { "tfdocs=info,warn" };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

/// Map an error to the process exit status.
fn exit_code(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<CoreError>()
        .map(|core| u8::try_from(core.exit_code()).unwrap_or(ExitCodes::GENERAL_ERROR))
        .unwrap_or(ExitCodes::GENERAL_ERROR)
}
