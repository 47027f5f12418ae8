//! CLI command definitions.
//!
//! The action runs with no arguments at all inside a CI container; the
//! subcommands exist for local use and debugging.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use tfdocs_core::HostEnv;
use tfdocs_runner::{ProcessRunner, ProcessRunnerOptions};

pub mod plan;
pub mod run;

/// tfdocs-action - run terraform-docs from a CI action
#[derive(Parser)]
#[command(name = "tfdocs-action")]
#[command(version, about = "Generate Terraform module docs with terraform-docs and commit them")]
#[command(long_about = r#"
Generates documentation for Terraform modules with terraform-docs, injects
it into each module's output file and optionally commits and pushes the
result.

Action inputs are read from INPUT_* environment variables, e.g.
INPUT_WORKING_DIR, INPUT_OUTPUT_FORMAT, INPUT_GIT_PUSH.

COMMANDS:
  run   → Generate docs and commit/push/fail-on-diff (default)
  plan  → Print the terraform-docs commands that would run

EXIT CODES:
  0 - Success or nothing to do
  1 - Uncommitted changes with fail-on-diff, or a general error
  N - Exit code of a failing terraform-docs or git command
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to GITHUB_WORKSPACE, FORGEJO_WORKSPACE or the current directory)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// File receiving action outputs (defaults to GITHUB_OUTPUT or FORGEJO_OUTPUT)
    #[arg(long, global = true)]
    pub output_file: Option<PathBuf>,

    /// terraform-docs binary to run
    #[arg(
        long,
        global = true,
        env = "TERRAFORM_DOCS_BIN",
        default_value = tfdocs_core::terraform_docs::DEFAULT_BINARY
    )]
    pub terraform_docs_bin: String,

    /// Log commands instead of executing them
    #[arg(long, global = true)]
    pub dry_run: bool,
}

impl GlobalArgs {
    /// Host environment with command-line overrides applied.
    pub fn host(&self) -> Result<HostEnv> {
        let mut host = HostEnv::detect()?;
        if let Some(workspace) = &self.workspace {
            host.workspace = workspace.clone();
        }
        if let Some(output_file) = &self.output_file {
            host.output_file = Some(output_file.clone());
        }
        Ok(host)
    }

    pub fn runner(&self) -> Arc<ProcessRunner> {
        Arc::new(ProcessRunner::new(self.runner_options(ProcessRunnerOptions::new())))
    }

    /// In CI, child output is echoed with timestamps after each command.
    fn runner_options(&self, base: ProcessRunnerOptions) -> ProcessRunnerOptions {
        let ci_mode = base.ci_mode;
        let options = base.echo_output(ci_mode);
        if self.dry_run {
            options.dry_run()
        } else {
            options
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate docs and commit, push or fail on diff
    Run(run::RunArgs),

    /// Show the terraform-docs invocations without running anything
    Plan(plan::PlanArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals(args: &[&str]) -> GlobalArgs {
        let argv = std::iter::once("tfdocs-action").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().globals
    }

    #[test]
    fn test_runner_options_echo_in_ci() {
        let base = ProcessRunnerOptions {
            ci_mode: true,
            ..ProcessRunnerOptions::default()
        };
        let options = globals(&[]).runner_options(base);
        assert!(options.echo_output);
        assert!(!options.dry_run);

        let base = ProcessRunnerOptions {
            ci_mode: false,
            ..ProcessRunnerOptions::default()
        };
        let options = globals(&["--dry-run"]).runner_options(base);
        assert!(!options.echo_output);
        assert!(options.dry_run);
    }
}
