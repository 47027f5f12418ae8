//! Mock command runner for testing.
//!
//! Provides a scriptable implementation of the CommandRunner trait for use in
//! tests that must not depend on `git` or `terraform-docs` being installed.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::config::CommandSpec;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandOutput, CommandRunner};

/// Predefined mock response for a command execution.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            duration_ms: 10,
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration_ms: 10,
        }
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
}

impl CapturedCall {
    /// Whether this call ran `program` with arguments starting with `prefix`.
    pub fn matches(&self, program: &str, prefix: &[&str]) -> bool {
        self.program == program
            && prefix.len() <= self.args.len()
            && self.args.iter().zip(prefix).all(|(arg, expected)| arg == expected)
    }
}

/// Responses scripted for one program + argument prefix.
#[derive(Debug)]
struct Expectation {
    program: String,
    prefix: Vec<String>,
    responses: VecDeque<MockResponse>,
}

/// Mock command runner for testing.
///
/// Responses are matched against the first registered expectation whose
/// program and argument prefix fit the call. Each expectation hands out its
/// responses in order and keeps repeating the last one. Calls that match no
/// expectation succeed with empty output.
#[derive(Clone, Default)]
pub struct MockRunner {
    /// Scripted responses, in registration order.
    expectations: Arc<RwLock<Vec<Expectation>>>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    /// Programs reported as missing.
    missing_programs: Arc<RwLock<Vec<String>>>,
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for calls to `program` whose arguments start with
    /// `prefix`. Repeated calls with the same key queue further responses.
    pub fn on(self, program: &str, prefix: &[&str], response: MockResponse) -> Self {
        {
            let mut expectations = self.expectations.write();
            let existing = expectations
                .iter_mut()
                .find(|e| {
                    e.program == program
                        && e.prefix.iter().map(String::as_str).eq(prefix.iter().copied())
                });
            match existing {
                Some(expectation) => expectation.responses.push_back(response),
                None => expectations.push(Expectation {
                    program: program.to_string(),
                    prefix: prefix.iter().map(|s| s.to_string()).collect(),
                    responses: VecDeque::from([response]),
                }),
            }
        }
        self
    }

    /// Report `program` as not installed: runs fail with `ProgramNotFound`.
    pub fn missing_program(self, program: impl Into<String>) -> Self {
        self.missing_programs.write().push(program.into());
        self
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Get calls to `program` whose arguments start with `prefix`.
    pub fn calls_matching(&self, program: &str, prefix: &[&str]) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.matches(program, prefix))
            .cloned()
            .collect()
    }

    /// Check if a matching call was made.
    pub fn was_called(&self, program: &str, prefix: &[&str]) -> bool {
        self.captured_calls
            .read()
            .iter()
            .any(|c| c.matches(program, prefix))
    }

    /// Record a call.
    fn record_call(&self, spec: &CommandSpec) {
        self.captured_calls.write().push(CapturedCall {
            program: spec.program.clone(),
            args: spec.args.clone(),
            workdir: spec.workdir.clone(),
        });
    }

    /// Get the next response for a call.
    fn next_response(&self, spec: &CommandSpec) -> MockResponse {
        let mut expectations = self.expectations.write();
        let Some(expectation) = expectations.iter_mut().find(|e| {
            e.program == spec.program
                && spec.has_arg_prefix(&e.prefix.iter().map(String::as_str).collect::<Vec<_>>())
        }) else {
            return MockResponse::success("");
        };

        if expectation.responses.len() > 1 {
            expectation
                .responses
                .pop_front()
                .unwrap_or_else(|| MockResponse::success(""))
        } else {
            expectation
                .responses
                .front()
                .cloned()
                .unwrap_or_else(|| MockResponse::success(""))
        }
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, spec: &CommandSpec) -> RunnerResult<CommandOutput> {
        self.record_call(spec);

        if self.missing_programs.read().contains(&spec.program) {
            return Err(RunnerError::ProgramNotFound(spec.program.clone()));
        }

        let response = self.next_response(spec);
        let started_at = Utc::now();
        let finished_at = started_at + chrono::Duration::milliseconds(response.duration_ms as i64);

        Ok(CommandOutput {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            started_at,
            finished_at,
            duration_ms: response.duration_ms,
        })
    }

    async fn is_available(&self, program: &str) -> bool {
        !self.missing_programs.read().iter().any(|p| p == program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_runner_default_success() {
        let runner = MockRunner::new();
        let result = runner.run(&CommandSpec::new("git").arg("push")).await.unwrap();

        assert!(result.success());
        assert!(result.stdout.is_empty());
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_runner_matches_prefix() {
        let runner = MockRunner::new()
            .on("git", &["status", "--porcelain"], MockResponse::success(" M README.md\n"))
            .on("git", &["push"], MockResponse::failure(128, "denied"));

        let status = runner
            .run(&CommandSpec::new("git").args(["status", "--porcelain", "--", "README.md"]))
            .await
            .unwrap();
        assert_eq!(status.stdout, " M README.md\n");

        let push = runner.run(&CommandSpec::new("git").arg("push")).await.unwrap();
        assert_eq!(push.exit_code, 128);
        assert_eq!(push.stderr, "denied");

        let other = runner.run(&CommandSpec::new("git").arg("add")).await.unwrap();
        assert!(other.success());
    }

    #[tokio::test]
    async fn test_mock_runner_sequential_responses_repeat_last() {
        let runner = MockRunner::new()
            .on("terraform-docs", &[], MockResponse::success("first"))
            .on("terraform-docs", &[], MockResponse::failure(2, "second"));

        let spec = CommandSpec::new("terraform-docs").arg(".");
        assert_eq!(runner.run(&spec).await.unwrap().stdout, "first");
        assert_eq!(runner.run(&spec).await.unwrap().exit_code, 2);
        assert_eq!(runner.run(&spec).await.unwrap().exit_code, 2);
    }

    #[tokio::test]
    async fn test_mock_runner_captures_calls() {
        let runner = MockRunner::new();
        let spec = CommandSpec::new("git")
            .args(["commit", "-m", "msg"])
            .workdir("/workspace");

        let _ = runner.run(&spec).await;

        let calls = runner.calls_matching("git", &["commit"]);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["commit", "-m", "msg"]);
        assert_eq!(calls[0].workdir, Some(PathBuf::from("/workspace")));
        assert!(!runner.was_called("git", &["push"]));

        runner.clear_calls();
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_runner_missing_program() {
        let runner = MockRunner::new().missing_program("terraform-docs");

        assert!(!runner.is_available("terraform-docs").await);
        assert!(runner.is_available("git").await);

        let result = runner.run(&CommandSpec::new("terraform-docs")).await;
        assert!(matches!(result, Err(RunnerError::ProgramNotFound(_))));
    }
}
