//! # tfdocs_runner
//!
//! Subprocess execution wrapper for tfdocs-action.
//!
//! Every external tool the action drives (`git`, `terraform-docs`) is launched
//! through the [`CommandRunner`] trait, so the orchestration logic can be
//! tested against a [`MockRunner`] instead of real binaries.
//!
//! # Features
//!
//! - **Process Runner**: async execution via `tokio::process` with captured output
//! - **Dry-Run Mode**: log commands without executing them
//! - **CI Integration**: timestamped output echo compatible with hosted runners
//! - **Mock Runner**: scripted responses and call capture for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use tfdocs_runner::{CommandRunner, CommandSpec, ProcessRunner, ProcessRunnerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = ProcessRunner::new(ProcessRunnerOptions::default());
//!
//!     let spec = CommandSpec::new("git").args(["status", "--porcelain"]);
//!     let result = runner.run(&spec).await?;
//!     println!("Exit code: {}", result.exit_code);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod mock;
pub mod process;
pub mod runner;

pub use config::CommandSpec;
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockResponse, MockRunner};
pub use process::{ProcessRunner, ProcessRunnerOptions};
pub use runner::{CommandOutput, CommandRunner};
