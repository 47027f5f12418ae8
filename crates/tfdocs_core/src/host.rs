//! CI host integration (GitHub Actions and Forgejo Actions).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

/// Which CI host provided the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    GitHub,
    Forgejo,
    Local,
}

/// Workspace and output-capture locations of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    pub kind: HostKind,
    pub workspace: PathBuf,
    pub output_file: Option<PathBuf>,
}

impl HostEnv {
    pub fn new(kind: HostKind, workspace: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            workspace: workspace.into(),
            output_file: None,
        }
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Detect from the process environment.
    pub fn detect() -> CoreResult<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::from_lookup(|name| std::env::var(name).ok(), cwd))
    }

    /// Detect through an arbitrary variable lookup. GitHub variables win over
    /// Forgejo ones; without either the current directory is the workspace.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, cwd: PathBuf) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let (kind, workspace) = if let Some(ws) = non_empty("GITHUB_WORKSPACE") {
            (HostKind::GitHub, PathBuf::from(ws))
        } else if let Some(ws) = non_empty("FORGEJO_WORKSPACE") {
            (HostKind::Forgejo, PathBuf::from(ws))
        } else {
            (HostKind::Local, cwd)
        };

        let output_file = non_empty("GITHUB_OUTPUT")
            .or_else(|| non_empty("FORGEJO_OUTPUT"))
            .map(PathBuf::from);

        Self {
            kind,
            workspace,
            output_file,
        }
    }

    /// Append `key=value` to the output-capture file.
    pub fn set_output(&self, key: &str, value: &str) -> CoreResult<()> {
        let Some(path) = &self.output_file else {
            warn!("No output file configured, not recording {}={}", key, value);
            return Ok(());
        };

        append_line(path, &format!("{}={}", key, value)).map_err(|source| {
            CoreError::OutputFile {
                path: path.clone(),
                source,
            }
        })?;
        debug!("Set output {}={}", key, value);
        Ok(())
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

/// Workflow command levels rendered in the runner UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Debug,
    Notice,
    Warning,
    Error,
}

impl AnnotationLevel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Format a workflow command line, escaping the message.
pub fn workflow_command(level: AnnotationLevel, message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{}::{}", level.as_str(), escaped)
}

/// Print a workflow command to stdout, where the runner picks it up.
pub fn annotate(level: AnnotationLevel, message: &str) {
    println!("{}", workflow_command(level, message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_github_wins_over_forgejo() {
        let host = HostEnv::from_lookup(
            lookup(&[
                ("GITHUB_WORKSPACE", "/github/workspace"),
                ("FORGEJO_WORKSPACE", "/forgejo"),
                ("FORGEJO_OUTPUT", "/tmp/forgejo-out"),
            ]),
            PathBuf::from("/cwd"),
        );
        assert_eq!(host.kind, HostKind::GitHub);
        assert_eq!(host.workspace, PathBuf::from("/github/workspace"));
        assert_eq!(host.output_file, Some(PathBuf::from("/tmp/forgejo-out")));
    }

    #[test]
    fn test_forgejo_and_local() {
        let host = HostEnv::from_lookup(lookup(&[("FORGEJO_WORKSPACE", "/forgejo")]), PathBuf::from("/cwd"));
        assert_eq!(host.kind, HostKind::Forgejo);
        assert_eq!(host.output_file, None);

        let host = HostEnv::from_lookup(lookup(&[("GITHUB_WORKSPACE", "")]), PathBuf::from("/cwd"));
        assert_eq!(host.kind, HostKind::Local);
        assert_eq!(host.workspace, PathBuf::from("/cwd"));
    }

    #[test]
    fn test_set_output_appends() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("output");
        std::fs::write(&out, "previous=1\n").unwrap();

        let host = HostEnv::new(HostKind::GitHub, dir.path()).with_output_file(&out);
        host.set_output("num_changed", "3").unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "previous=1\nnum_changed=3\n");
    }

    #[test]
    fn test_set_output_without_file_is_noop() {
        let host = HostEnv::new(HostKind::Local, "/ws");
        host.set_output("num_changed", "0").unwrap();
    }

    #[test]
    fn test_workflow_command_escaping() {
        assert_eq!(
            workflow_command(AnnotationLevel::Error, "Uncommitted change(s) has been found!"),
            "::error::Uncommitted change(s) has been found!"
        );
        assert_eq!(
            workflow_command(AnnotationLevel::Warning, "50%\ndone"),
            "::warning::50%25%0Adone"
        );
    }
}
