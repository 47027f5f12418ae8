//! terraform-docs invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use tfdocs_runner::{CommandRunner, CommandSpec, RunnerError};

use crate::args::DocCommand;
use crate::error::{CoreError, CoreResult};

/// Default binary name, resolved through `PATH`.
pub const DEFAULT_BINARY: &str = "terraform-docs";

/// Runs terraform-docs for one module directory at a time.
pub struct TerraformDocs {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    workspace: PathBuf,
}

impl TerraformDocs {
    pub fn new(runner: Arc<dyn CommandRunner>, workspace: impl AsRef<Path>) -> Self {
        Self {
            runner,
            binary: DEFAULT_BINARY.to_string(),
            workspace: workspace.as_ref().to_path_buf(),
        }
    }

    /// Use a custom terraform-docs binary.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Process invocation for a command.
    pub fn spec(&self, command: &DocCommand) -> CommandSpec {
        CommandSpec::new(&self.binary)
            .args(command.to_args())
            .workdir(&self.workspace)
    }

    /// Fail early when the binary cannot be launched.
    pub async fn ensure_available(&self) -> CoreResult<()> {
        if self.runner.is_available(&self.binary).await {
            Ok(())
        } else {
            Err(RunnerError::ProgramNotFound(self.binary.clone()).into())
        }
    }

    /// Generate documentation. A non-zero exit aborts with the tool's code.
    pub async fn generate(&self, command: &DocCommand) -> CoreResult<()> {
        let spec = self.spec(command);
        debug!("{}", spec);

        let output = self.runner.run(&spec).await?;
        for line in output.stdout_lines() {
            info!("{}", line);
        }
        for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
            warn!("{}", line);
        }

        if !output.success() {
            return Err(CoreError::DocGeneration {
                dir: command.dir.clone(),
                exit_code: output.exit_code,
            });
        }
        Ok(())
    }
}
