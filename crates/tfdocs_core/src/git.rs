//! Git operations for staging, committing and publishing generated docs.
//!
//! Every call shells out to `git` through the shared command runner with the
//! workspace as working directory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use tfdocs_runner::{CommandOutput, CommandRunner, CommandSpec};

use crate::error::{CoreError, CoreResult};
use crate::inputs::GitSettings;

/// Porcelain lines whose index or work-tree column shows an addition or
/// modification.
static CHANGED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[MA].|.[MA]) .+").expect("porcelain pattern is valid")
});

/// Count added/modified entries in `git status --porcelain` output.
pub fn count_changed(porcelain: &str) -> usize {
    porcelain
        .lines()
        .filter(|line| CHANGED_LINE.is_match(line))
        .count()
}

/// Git operations manager.
pub struct GitOps {
    runner: Arc<dyn CommandRunner>,
    repo_path: PathBuf,
}

impl GitOps {
    /// Create a new Git operations manager for a repository.
    pub fn new<P: AsRef<Path>>(runner: Arc<dyn CommandRunner>, repo_path: P) -> Self {
        Self {
            runner,
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// git never prompts: a push without credentials fails instead of hanging.
    fn spec(&self, args: &[&str]) -> CommandSpec {
        CommandSpec::new("git")
            .args(args.iter().copied())
            .workdir(&self.repo_path)
            .env("GIT_TERMINAL_PROMPT", "0")
    }

    async fn git(&self, args: &[&str]) -> CoreResult<CommandOutput> {
        Ok(self.runner.run(&self.spec(args)).await?)
    }

    /// Run git and turn a non-zero exit into an error.
    async fn git_checked(&self, args: &[&str]) -> CoreResult<CommandOutput> {
        let output = self.git(args).await?;
        if !output.success() {
            return Err(CoreError::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                exit_code: output.exit_code,
                stderr: output.combined_output().trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Configure identity and trust for the workspace, then fetch tags.
    ///
    /// `safe_directory` is registered because the workspace mount is usually
    /// owned by a different user than the one running the action.
    pub async fn setup(&self, settings: &GitSettings, safe_directory: &Path) -> CoreResult<()> {
        let safe_directory = safe_directory.display().to_string();
        self.git_checked(&["config", "--global", "--add", "safe.directory", &safe_directory])
            .await?;
        self.git_checked(&["config", "--global", "user.name", &settings.user_name])
            .await?;
        self.git_checked(&["config", "--global", "user.email", &settings.user_email])
            .await?;

        let fetch = self
            .git(&["fetch", "--depth=1", "origin", "+refs/tags/*:refs/tags/*"])
            .await?;
        if !fetch.success() {
            warn!("Fetching tags failed, continuing: {}", fetch.combined_output().trim());
        }

        Ok(())
    }

    /// Stage a file and report whether it carries a change.
    pub async fn add(&self, file: &Path) -> CoreResult<bool> {
        let file = file.display().to_string();
        self.git_checked(&["add", &file]).await?;

        let status = self
            .git_checked(&["status", "--porcelain", "--", &file])
            .await?;
        let changed = count_changed(&status.stdout) > 0;
        if changed {
            debug!("Added {} to git staging area", file);
        } else {
            debug!("No change in {} detected", file);
        }
        Ok(changed)
    }

    /// Number of added or modified paths in the whole tree.
    pub async fn changed_count(&self) -> CoreResult<usize> {
        let status = self.git_checked(&["status", "--porcelain"]).await?;
        Ok(count_changed(&status.stdout))
    }

    /// Short status, for logging what is about to be committed.
    pub async fn short_status(&self) -> CoreResult<String> {
        let status = self.git_checked(&["status", "-s"]).await?;
        Ok(status.stdout)
    }

    /// Commit staged changes.
    pub async fn commit(&self, message: &str, sign_off: bool) -> CoreResult<()> {
        let mut args = vec!["commit", "-m", message];
        if sign_off {
            args.push("-s");
        }

        info!("Committing documentation changes");
        self.git_checked(&args).await?;
        Ok(())
    }

    /// Push to the configured upstream.
    pub async fn push(&self) -> CoreResult<()> {
        info!("Pushing documentation changes");
        self.git_checked(&["push"]).await?;
        Ok(())
    }
}
