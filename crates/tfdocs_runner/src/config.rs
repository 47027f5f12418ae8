//! Command configuration types.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single subprocess invocation: program, ordered arguments, working
/// directory and extra environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute (looked up on `PATH` when not a path)
    pub program: String,
    /// Arguments, passed verbatim without any shell interpretation
    pub args: Vec<String>,
    /// Working directory for the child process
    pub workdir: Option<PathBuf>,
    /// Additional environment variables
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn workdir(mut self, dir: impl AsRef<Path>) -> Self {
        self.workdir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Whether the arguments start with the given prefix.
    pub fn has_arg_prefix(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.args.len()
            && self.args.iter().zip(prefix).all(|(arg, expected)| arg == expected)
    }

    /// Render the command line for logs, quoting arguments that would
    /// otherwise be ambiguous.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('\'') {
                line.push_str(&format!(" '{}'", arg.replace('\'', "'\\''")));
            } else {
                line.push(' ');
                line.push_str(arg);
            }
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}
