//! Host process runner.
//!
//! Launches real subprocesses with `tokio::process`, capturing their output.
//! Supports a dry-run mode that only logs the command line, and a CI mode that
//! prefixes echoed output with timestamps the way hosted runners display it.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::CommandSpec;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandOutput, CommandRunner};

/// Process runner options.
#[derive(Debug, Clone)]
pub struct ProcessRunnerOptions {
    /// Dry-run mode (log commands without executing)
    pub dry_run: bool,
    /// CI mode (timestamped echo of child output)
    pub ci_mode: bool,
    /// Echo child stdout/stderr after each command
    pub echo_output: bool,
}

impl Default for ProcessRunnerOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            ci_mode: std::env::var("CI").is_ok(),
            echo_output: false,
        }
    }
}

impl ProcessRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn echo_output(mut self, enabled: bool) -> Self {
        self.echo_output = enabled;
        self
    }
}

/// Runner that executes commands on the host.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    options: ProcessRunnerOptions,
}

impl ProcessRunner {
    pub fn new(options: ProcessRunnerOptions) -> Self {
        Self { options }
    }

    /// Check if dry-run mode is enabled.
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    fn echo_line(&self, stream: &str, line: &str) -> String {
        if self.options.ci_mode {
            format!(
                "[{}] [{}] {}",
                Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                stream,
                line
            )
        } else {
            line.to_string()
        }
    }

    fn echo(&self, stream: &str, text: &str) {
        for line in text.lines() {
            let line = self.echo_line(stream, line);
            if stream == "stderr" && !self.options.ci_mode {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }

    fn spawn_error(program: &str, err: std::io::Error) -> RunnerError {
        if err.kind() == ErrorKind::NotFound {
            RunnerError::ProgramNotFound(program.to_string())
        } else {
            RunnerError::SpawnFailed {
                program: program.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> RunnerResult<CommandOutput> {
        let started_at = Utc::now();

        if self.options.dry_run {
            info!("[dry-run] {}", spec);
            return Ok(CommandOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                started_at,
                finished_at: started_at,
                duration_ms: 0,
            });
        }

        debug!("Executing: {}", spec);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.workdir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let output = cmd
            .output()
            .await
            .map_err(|e| Self::spawn_error(&spec.program, e))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let exit_code = output
            .status
            .code()
            .ok_or_else(|| RunnerError::Terminated(spec.display_line()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if self.options.echo_output {
            self.echo("stdout", &stdout);
            self.echo("stderr", &stderr);
        }

        debug!("{} exited with {} in {}ms", spec.program, exit_code, duration_ms);

        Ok(CommandOutput {
            exit_code,
            stdout,
            stderr,
            started_at,
            finished_at: Utc::now(),
            duration_ms,
        })
    }

    async fn is_available(&self, program: &str) -> bool {
        if self.options.dry_run {
            return true;
        }
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
