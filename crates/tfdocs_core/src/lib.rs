//! # tfdocs_core
//!
//! Orchestration for running terraform-docs from a CI action.
//!
//! This crate turns the action inputs into a typed configuration, decides
//! which Terraform module directories to document, drives terraform-docs for
//! each of them and records the result in git.
//!
//! ## Features
//!
//! - Input sanitization and defaulting for `INPUT_*` variables
//! - Atlantis, find-dir and explicit directory discovery
//! - Typed terraform-docs command assembly
//! - Git staging, change counting, commit and push
//! - `num_changed` output for GitHub and Forgejo hosts
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tfdocs_core::{Action, ActionConfig, HostEnv};
//! use tfdocs_runner::{ProcessRunner, ProcessRunnerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = Arc::new(ProcessRunner::new(ProcessRunnerOptions::default()));
//!     let action = Action::new(ActionConfig::from_env(), HostEnv::detect()?, runner);
//!
//!     let outcome = action.run().await?;
//!     println!("num_changed={}", outcome.num_changed);
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod args;
pub mod error;
pub mod format;
pub mod git;
pub mod host;
pub mod inputs;
pub mod resolver;
pub mod terraform_docs;

pub use action::{Action, ActionOutcome, ActionPlan, Disposition, PlannedCommand, NUM_CHANGED_OUTPUT};
pub use args::{BaseArgs, DocCommand, DocFlag};
pub use error::{CoreError, CoreResult};
pub use format::{FormatKind, FormatVariant, OutputFormat};
pub use git::{count_changed, GitOps};
pub use host::{annotate, workflow_command, AnnotationLevel, HostEnv, HostKind};
pub use inputs::{ActionConfig, GitSettings, InputKey, OutputMethod, RawInputs};
pub use resolver::{resolve_worklist, DirectoryStrategy};
pub use terraform_docs::TerraformDocs;
