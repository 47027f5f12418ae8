//! Error types for the runner module.

use thiserror::Error;

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that can occur while launching a subprocess.
///
/// A process that starts and exits non-zero is not an error at this layer;
/// callers inspect [`crate::CommandOutput::exit_code`] themselves.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Program not found: {0}")]
    ProgramNotFound(String),

    #[error("Failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("Process terminated by signal: {0}")]
    Terminated(String),
}
