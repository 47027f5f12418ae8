//! The action engine: generate docs for every directory, then commit, fail
//! or leave the diff in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use tfdocs_runner::CommandRunner;

use crate::args::{BaseArgs, DocCommand};
use crate::error::{CoreError, CoreResult};
use crate::git::GitOps;
use crate::host::HostEnv;
use crate::inputs::ActionConfig;
use crate::resolver::DirectoryStrategy;
use crate::terraform_docs::TerraformDocs;

/// Name of the output carrying the changed-file count.
pub const NUM_CHANGED_OUTPUT: &str = "num_changed";

/// What happened to the generated changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Nothing changed; no commit attempted.
    NoChanges,
    /// Changes committed and pushed.
    Pushed,
    /// Changes left in the working tree.
    LeftUncommitted,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub num_changed: usize,
    pub directories: Vec<PathBuf>,
    pub disposition: Disposition,
}

/// One planned terraform-docs invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedCommand {
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

/// Everything the action would do, without doing it.
#[derive(Debug, Clone, Serialize)]
pub struct ActionPlan {
    pub workspace: PathBuf,
    pub strategy: DirectoryStrategy,
    pub config: ActionConfig,
    pub commands: Vec<PlannedCommand>,
}

/// Runs the action against one workspace.
pub struct Action {
    config: ActionConfig,
    host: HostEnv,
    docs: TerraformDocs,
    git: GitOps,
}

impl Action {
    pub fn new(config: ActionConfig, host: HostEnv, runner: Arc<dyn CommandRunner>) -> Self {
        let docs = TerraformDocs::new(runner.clone(), &host.workspace);
        let git = GitOps::new(runner, &host.workspace);
        Self {
            config,
            host,
            docs,
            git,
        }
    }

    /// Use a custom terraform-docs binary.
    pub fn with_terraform_docs_binary(mut self, binary: impl Into<String>) -> Self {
        self.docs = self.docs.with_binary(binary);
        self
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn workspace(&self) -> &Path {
        &self.host.workspace
    }

    /// Directory registered as git `safe.directory`.
    fn repository_dir(&self) -> PathBuf {
        match &self.config.git.sub_dir {
            Some(sub_dir) => self.workspace().join(sub_dir),
            None => self.workspace().to_path_buf(),
        }
    }

    /// Resolve the worklist and the command for each directory.
    pub fn plan(&self) -> CoreResult<ActionPlan> {
        let strategy = DirectoryStrategy::select(&self.config, self.workspace());
        let directories = strategy.resolve(self.workspace())?;
        let base = BaseArgs::from_config(&self.config);

        let commands = directories
            .iter()
            .map(|dir| {
                let command = base.for_directory(&self.config, self.workspace(), dir);
                PlannedCommand {
                    dir: dir.clone(),
                    program: self.docs.binary().to_string(),
                    args: command.to_args(),
                }
            })
            .collect();

        Ok(ActionPlan {
            workspace: self.workspace().to_path_buf(),
            strategy,
            config: self.config.clone(),
            commands,
        })
    }

    /// Run the whole action. The first failing subprocess aborts the run.
    pub async fn run(&self) -> CoreResult<ActionOutcome> {
        let base = BaseArgs::from_config(&self.config);

        let strategy = DirectoryStrategy::select(&self.config, self.workspace());
        let directories = strategy.resolve(self.workspace())?;
        if !directories.is_empty() {
            self.docs.ensure_available().await?;
        }

        self.git
            .setup(&self.config.git, &self.repository_dir())
            .await?;

        for dir in &directories {
            let command = base.for_directory(&self.config, self.workspace(), dir);
            self.update_doc(&command).await?;
        }

        let num_changed = self.git.changed_count().await?;
        self.host
            .set_output(NUM_CHANGED_OUTPUT, &num_changed.to_string())?;

        let disposition = self.finish(num_changed).await?;

        Ok(ActionOutcome {
            num_changed,
            directories,
            disposition,
        })
    }

    async fn update_doc(&self, command: &DocCommand) -> CoreResult<()> {
        info!("Generating documentation for {}", command.dir.display());
        self.docs.generate(command).await?;

        if command.writes_output_file() {
            self.git
                .add(&command.dir.join(&self.config.output_file))
                .await?;
        }
        Ok(())
    }

    /// Commit/push, fail on diff, or leave the tree alone.
    async fn finish(&self, num_changed: usize) -> CoreResult<Disposition> {
        if self.config.git.push {
            if num_changed == 0 {
                info!("No files changed, skipping commit");
                return Ok(Disposition::NoChanges);
            }

            info!(
                "Following files will be committed:\n{}",
                self.git.short_status().await?.trim_end()
            );
            self.git
                .commit(&self.config.git.commit_message, self.config.git.sign_off)
                .await?;
            self.git.push().await?;
            return Ok(Disposition::Pushed);
        }

        if num_changed == 0 {
            return Ok(Disposition::NoChanges);
        }

        if self.config.fail_on_diff {
            error!("Uncommitted change(s) has been found!");
            return Err(CoreError::UncommittedChanges(num_changed));
        }

        info!("{} file(s) changed, leaving them uncommitted", num_changed);
        Ok(Disposition::LeftUncommitted)
    }
}
