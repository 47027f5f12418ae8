//! terraform-docs command line assembly.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::inputs::{ActionConfig, OutputMethod};

/// A flag terraform-docs accepts, with its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "flag", content = "value", rename_all = "kebab-case")]
pub enum DocFlag {
    Indent(String),
    Config(PathBuf),
    OutputMode(OutputMethod),
    OutputFile(String),
    OutputTemplate(String),
    Recursive,
    RecursivePath(String),
}

impl DocFlag {
    fn push_to(&self, argv: &mut Vec<String>) {
        match self {
            Self::Indent(width) => argv.extend(["--indent".to_string(), width.clone()]),
            Self::Config(path) => {
                argv.extend(["--config".to_string(), path.display().to_string()])
            }
            Self::OutputMode(method) => {
                argv.extend(["--output-mode".to_string(), method.as_str().to_string()])
            }
            Self::OutputFile(file) => argv.extend(["--output-file".to_string(), file.clone()]),
            Self::OutputTemplate(template) => {
                argv.extend(["--output-template".to_string(), template.clone()])
            }
            Self::Recursive => argv.push("--recursive".to_string()),
            Self::RecursivePath(path) => {
                argv.extend(["--recursive-path".to_string(), path.clone()])
            }
        }
    }
}

/// Arguments shared by every directory: format tokens, extra args and the
/// optional indentation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseArgs {
    pub format: Vec<String>,
    pub extra: Vec<String>,
    pub indent: Option<DocFlag>,
}

impl BaseArgs {
    pub fn from_config(config: &ActionConfig) -> Self {
        // A config file owns indentation.
        let indent = (config.config_file.is_none() && config.output_format.supports_indent())
            .then(|| DocFlag::Indent(config.indention.clone()));

        Self {
            format: config.output_format.tokens(),
            extra: config.args.clone(),
            indent,
        }
    }

    /// Extend the base arguments for one target directory.
    pub fn for_directory(&self, config: &ActionConfig, workspace: &Path, dir: &Path) -> DocCommand {
        let mut flags = Vec::new();

        if let Some(config_file) = &config.config_file {
            let resolved = if workspace.join(config_file).is_file() {
                config_file.clone()
            } else {
                dir.join(config_file)
            };
            debug!("config_file={}", resolved.display());
            flags.push(DocFlag::Config(resolved));
        }

        if config.output_method.writes_file() {
            debug!("output_mode={}", config.output_method.as_str());
            flags.push(DocFlag::OutputMode(config.output_method));
            debug!("output_file={}", config.output_file);
            flags.push(DocFlag::OutputFile(config.output_file.clone()));
        }

        if let Some(template) = &config.template {
            flags.push(DocFlag::OutputTemplate(template.clone()));
        }

        if config.recursive {
            if let Some(path) = &config.recursive_path {
                flags.push(DocFlag::Recursive);
                flags.push(DocFlag::RecursivePath(path.clone()));
            }
        }

        DocCommand {
            base: self.clone(),
            flags,
            dir: dir.to_path_buf(),
        }
    }
}

/// Complete terraform-docs invocation for one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocCommand {
    pub base: BaseArgs,
    pub flags: Vec<DocFlag>,
    /// Target module directory, always the last argument
    pub dir: PathBuf,
}

impl DocCommand {
    /// Build directly from the configuration.
    pub fn build(config: &ActionConfig, workspace: &Path, dir: &Path) -> Self {
        BaseArgs::from_config(config).for_directory(config, workspace, dir)
    }

    /// Serialize to the process argument vector.
    pub fn to_args(&self) -> Vec<String> {
        let mut argv = self.base.format.clone();
        argv.extend(self.base.extra.iter().cloned());
        if let Some(indent) = &self.base.indent {
            indent.push_to(&mut argv);
        }
        for flag in &self.flags {
            flag.push_to(&mut argv);
        }
        argv.push(self.dir.display().to_string());
        argv
    }

    /// Whether terraform-docs will write `output_file` for this command.
    pub fn writes_output_file(&self) -> bool {
        self.flags.iter().any(|f| matches!(f, DocFlag::OutputFile(_)))
    }
}
