//! Error types for the core module.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while running the action.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("terraform-docs failed for {dir} with exit code {exit_code}")]
    DocGeneration { dir: PathBuf, exit_code: i32 },

    #[error("git {command} failed with exit code {exit_code}: {stderr}")]
    Git {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Uncommitted change(s) has been found! ({0} file(s) changed)")]
    UncommittedChanges(usize),

    #[error("Invalid Atlantis file {path}: {source}")]
    AtlantisFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to search {path} for Terraform files: {message}")]
    FindDir { path: PathBuf, message: String },

    #[error("Failed to write action output to {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Runner error: {0}")]
    Runner(#[from] tfdocs_runner::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Process exit status this error should produce.
    ///
    /// Subprocess failures propagate the child's own exit code; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DocGeneration { exit_code, .. } | Self::Git { exit_code, .. } => {
                if *exit_code == 0 {
                    1
                } else {
                    *exit_code
                }
            }
            _ => 1,
        }
    }
}
