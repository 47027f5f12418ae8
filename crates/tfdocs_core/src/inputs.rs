//! Action input normalization.
//!
//! Inputs arrive as `INPUT_*` environment variables. Each value is sanitized
//! (hosts that fail to interpolate an expression leave the literal `${{ ... }}`
//! behind), defaulted, and parsed once into an immutable [`ActionConfig`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::format::OutputFormat;

/// Sentinel value that turns a path input off.
pub const DISABLED: &str = "disabled";

/// Template used when neither a template nor a config file is supplied.
pub const DEFAULT_TEMPLATE: &str = "<!-- BEGIN_TF_DOCS -->\n{{ .Content }}\n<!-- END_TF_DOCS -->";

pub const DEFAULT_COMMIT_MESSAGE: &str = "terraform-docs: automated action";
pub const DEFAULT_USER_NAME: &str = "github-actions[bot]";
pub const DEFAULT_USER_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

/// Every input the action recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKey {
    WorkingDir,
    AtlantisFile,
    FindDir,
    Recursive,
    RecursivePath,
    OutputFormat,
    OutputMethod,
    OutputFile,
    Template,
    Args,
    Indention,
    ConfigFile,
    FailOnDiff,
    GitPush,
    GitCommitMessage,
    GitPushSignOff,
    GitPushUserName,
    GitPushUserEmail,
    GitSubDir,
}

impl InputKey {
    pub const ALL: [InputKey; 19] = [
        Self::WorkingDir,
        Self::AtlantisFile,
        Self::FindDir,
        Self::Recursive,
        Self::RecursivePath,
        Self::OutputFormat,
        Self::OutputMethod,
        Self::OutputFile,
        Self::Template,
        Self::Args,
        Self::Indention,
        Self::ConfigFile,
        Self::FailOnDiff,
        Self::GitPush,
        Self::GitCommitMessage,
        Self::GitPushSignOff,
        Self::GitPushUserName,
        Self::GitPushUserEmail,
        Self::GitSubDir,
    ];

    /// Input name as declared in the action manifest.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WorkingDir => "working-dir",
            Self::AtlantisFile => "atlantis-file",
            Self::FindDir => "find-dir",
            Self::Recursive => "recursive",
            Self::RecursivePath => "recursive-path",
            Self::OutputFormat => "output-format",
            Self::OutputMethod => "output-method",
            Self::OutputFile => "output-file",
            Self::Template => "template",
            Self::Args => "args",
            Self::Indention => "indention",
            Self::ConfigFile => "config-file",
            Self::FailOnDiff => "fail-on-diff",
            Self::GitPush => "git-push",
            Self::GitCommitMessage => "git-commit-message",
            Self::GitPushSignOff => "git-push-sign-off",
            Self::GitPushUserName => "git-push-user-name",
            Self::GitPushUserEmail => "git-push-user-email",
            Self::GitSubDir => "git-sub-dir",
        }
    }

    /// Environment variable the host exposes the input as.
    pub fn env_var(&self) -> String {
        format!("INPUT_{}", self.name().to_uppercase().replace('-', "_"))
    }

    /// Fixed default. `None` means the input is either optional or has a
    /// derived default (template, git identity).
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Self::WorkingDir => Some("."),
            Self::AtlantisFile => Some(DISABLED),
            Self::FindDir => Some(DISABLED),
            Self::Recursive => Some("false"),
            Self::RecursivePath => Some("modules"),
            Self::OutputFormat => Some("markdown table"),
            Self::OutputMethod => Some("inject"),
            Self::OutputFile => Some("README.md"),
            Self::Indention => Some("2"),
            Self::ConfigFile => Some(DISABLED),
            Self::FailOnDiff => Some("false"),
            Self::GitPush => Some("false"),
            Self::GitCommitMessage => Some(DEFAULT_COMMIT_MESSAGE),
            Self::GitPushSignOff => Some("false"),
            Self::Template
            | Self::Args
            | Self::GitPushUserName
            | Self::GitPushUserEmail
            | Self::GitSubDir => None,
        }
    }
}

/// Whether a value still carries expression syntax the host did not evaluate.
///
/// Applies to every input, the template included: a template containing
/// `}}` is replaced by the default.
pub fn is_unevaluated(value: &str) -> bool {
    value.contains("${{") || value.contains("}}")
}

/// Input values as read from the host, before sanitization.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    values: BTreeMap<InputKey, String>,
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every `INPUT_*` variable from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read inputs through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut inputs = Self::new();
        for key in InputKey::ALL {
            if let Some(value) = lookup(&key.env_var()) {
                inputs.values.insert(key, value);
            }
        }
        inputs
    }

    pub fn with(mut self, key: InputKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: InputKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: InputKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Sanitized value: `None` when unset, empty or unevaluated.
    fn sanitized(&self, key: InputKey) -> Option<String> {
        let value = self.get(key)?;
        if is_unevaluated(value) {
            warn!(
                "Input {} contains an unevaluated expression, using its default",
                key.name()
            );
            return None;
        }
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }

    /// Sanitized value with the fixed default applied.
    fn value(&self, key: InputKey) -> String {
        self.sanitized(key)
            .or_else(|| key.default_value().map(str::to_string))
            .unwrap_or_default()
    }

    fn flag(&self, key: InputKey) -> bool {
        self.value(key).trim().eq_ignore_ascii_case("true")
    }

    /// Path input where `disabled` (or empty) turns the feature off.
    fn optional_path(&self, key: InputKey) -> Option<PathBuf> {
        let value = self.value(key);
        let value = value.trim();
        if value.is_empty() || value == DISABLED {
            None
        } else {
            Some(PathBuf::from(value))
        }
    }

    /// Produce the typed configuration. Never fails: anything unusable falls
    /// back to its default.
    pub fn normalize(&self) -> ActionConfig {
        let config_file = self.optional_path(InputKey::ConfigFile);

        let template = self.sanitized(InputKey::Template).or_else(|| {
            config_file
                .is_none()
                .then(|| DEFAULT_TEMPLATE.to_string())
        });

        let recursive_path = self.value(InputKey::RecursivePath);
        let recursive_path = Some(recursive_path.trim().to_string()).filter(|p| !p.is_empty());

        let git_sub_dir = self
            .sanitized(InputKey::GitSubDir)
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty() && dir != ".")
            .map(PathBuf::from);

        let config = ActionConfig {
            working_dir: self.value(InputKey::WorkingDir),
            atlantis_file: self.optional_path(InputKey::AtlantisFile),
            find_dir: self.optional_path(InputKey::FindDir),
            recursive: self.flag(InputKey::Recursive),
            recursive_path,
            output_format: OutputFormat::parse(&self.value(InputKey::OutputFormat)),
            output_method: OutputMethod::parse(&self.value(InputKey::OutputMethod)),
            output_file: self.value(InputKey::OutputFile),
            template,
            args: split_args(&self.value(InputKey::Args)),
            indention: self.value(InputKey::Indention).trim().to_string(),
            config_file,
            fail_on_diff: self.flag(InputKey::FailOnDiff),
            git: GitSettings {
                push: self.flag(InputKey::GitPush),
                commit_message: self.value(InputKey::GitCommitMessage),
                sign_off: self.flag(InputKey::GitPushSignOff),
                user_name: self
                    .sanitized(InputKey::GitPushUserName)
                    .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
                user_email: self
                    .sanitized(InputKey::GitPushUserEmail)
                    .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()),
                sub_dir: git_sub_dir,
            },
        };

        debug!("Normalized action config: {:?}", config);
        config
    }
}

/// Split the extra `args` input using shell word rules.
fn split_args(value: &str) -> Vec<String> {
    match shell_words::split(value) {
        Ok(words) => words,
        Err(e) => {
            warn!("Could not parse args {:?} ({}), splitting on whitespace", value, e);
            value.split_whitespace().map(str::to_string).collect()
        }
    }
}

/// How terraform-docs should write its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMethod {
    /// Insert between the template markers of an existing file.
    Inject,
    /// Overwrite the output file.
    Replace,
    /// Print to stdout only.
    Print,
}

impl OutputMethod {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "inject" => Self::Inject,
            "replace" => Self::Replace,
            _ => Self::Print,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inject => "inject",
            Self::Replace => "replace",
            Self::Print => "print",
        }
    }

    /// Whether terraform-docs writes to the output file in this mode.
    pub fn writes_file(&self) -> bool {
        matches!(self, Self::Inject | Self::Replace)
    }
}

/// Git identity and commit policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSettings {
    pub push: bool,
    pub commit_message: String,
    pub sign_off: bool,
    pub user_name: String,
    pub user_email: String,
    /// Repository location relative to the workspace, when not the root.
    pub sub_dir: Option<PathBuf>,
}

/// Fully normalized action configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Comma-separated directories for the explicit strategy
    pub working_dir: String,
    pub atlantis_file: Option<PathBuf>,
    pub find_dir: Option<PathBuf>,
    pub recursive: bool,
    pub recursive_path: Option<String>,
    pub output_format: OutputFormat,
    pub output_method: OutputMethod,
    pub output_file: String,
    pub template: Option<String>,
    /// Extra arguments for terraform-docs, already split
    pub args: Vec<String>,
    pub indention: String,
    pub config_file: Option<PathBuf>,
    pub fail_on_diff: bool,
    pub git: GitSettings,
}

impl Default for ActionConfig {
    fn default() -> Self {
        RawInputs::new().normalize()
    }
}

impl ActionConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        RawInputs::from_env().normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatKind, FormatVariant};

    #[test]
    fn test_env_var_names() {
        assert_eq!(InputKey::WorkingDir.env_var(), "INPUT_WORKING_DIR");
        assert_eq!(InputKey::GitPushSignOff.env_var(), "INPUT_GIT_PUSH_SIGN_OFF");
        assert_eq!(InputKey::Indention.env_var(), "INPUT_INDENTION");
    }

    #[test]
    fn test_defaults() {
        let config = ActionConfig::default();

        assert_eq!(config.working_dir, ".");
        assert_eq!(config.atlantis_file, None);
        assert_eq!(config.find_dir, None);
        assert!(!config.recursive);
        assert_eq!(config.recursive_path.as_deref(), Some("modules"));
        assert_eq!(
            config.output_format,
            OutputFormat::new(FormatKind::Markdown, Some(FormatVariant::Table))
        );
        assert_eq!(config.output_method, OutputMethod::Inject);
        assert_eq!(config.output_file, "README.md");
        assert_eq!(config.template.as_deref(), Some(DEFAULT_TEMPLATE));
        assert!(config.args.is_empty());
        assert_eq!(config.indention, "2");
        assert_eq!(config.config_file, None);
        assert!(!config.fail_on_diff);
        assert!(!config.git.push);
        assert_eq!(config.git.commit_message, DEFAULT_COMMIT_MESSAGE);
        assert!(!config.git.sign_off);
        assert_eq!(config.git.user_name, DEFAULT_USER_NAME);
        assert_eq!(config.git.user_email, DEFAULT_USER_EMAIL);
        assert_eq!(config.git.sub_dir, None);
    }

    #[test]
    fn test_unevaluated_expressions_fall_back_to_defaults() {
        let mut raw = RawInputs::new();
        for key in InputKey::ALL {
            raw.set(key, "${{ inputs.whatever }}");
        }
        assert_eq!(raw.normalize(), ActionConfig::default());

        let raw = RawInputs::new()
            .with(InputKey::WorkingDir, "modules }}")
            .with(InputKey::GitCommitMessage, "docs: ${{ github.sha");
        let config = raw.normalize();
        assert_eq!(config.working_dir, ".");
        assert_eq!(config.git.commit_message, DEFAULT_COMMIT_MESSAGE);
    }

    #[test]
    fn test_template_with_closing_braces_uses_default() {
        let template = "<!-- BEGIN -->\n{{ .Content }}\n<!-- END -->";
        let config = RawInputs::new().with(InputKey::Template, template).normalize();
        assert_eq!(config.template.as_deref(), Some(DEFAULT_TEMPLATE));

        let config = RawInputs::new()
            .with(InputKey::Template, "<!-- docs -->")
            .normalize();
        assert_eq!(config.template.as_deref(), Some("<!-- docs -->"));
    }

    #[test]
    fn test_is_unevaluated() {
        assert!(is_unevaluated("${{ inputs.dir"));
        assert!(is_unevaluated("modules }}"));
        assert!(!is_unevaluated("modules/vpc"));
        assert!(!is_unevaluated("{ .Content }"));
    }

    #[test]
    fn test_no_default_template_with_config_file() {
        let config = RawInputs::new()
            .with(InputKey::ConfigFile, ".terraform-docs.yml")
            .normalize();

        assert_eq!(config.config_file, Some(PathBuf::from(".terraform-docs.yml")));
        assert_eq!(config.template, None);
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = RawInputs::new()
            .with(InputKey::OutputFile, "")
            .with(InputKey::GitPushUserName, "")
            .normalize();
        assert_eq!(config.output_file, "README.md");
        assert_eq!(config.git.user_name, DEFAULT_USER_NAME);
    }

    #[test]
    fn test_flags_and_identity() {
        let config = RawInputs::new()
            .with(InputKey::GitPush, "true")
            .with(InputKey::GitPushSignOff, "TRUE")
            .with(InputKey::FailOnDiff, "yes")
            .with(InputKey::GitPushUserName, "docs-bot")
            .with(InputKey::GitPushUserEmail, "docs-bot@example.com")
            .normalize();

        assert!(config.git.push);
        assert!(config.git.sign_off);
        assert!(!config.fail_on_diff);
        assert_eq!(config.git.user_name, "docs-bot");
        assert_eq!(config.git.user_email, "docs-bot@example.com");
    }

    #[test]
    fn test_args_respect_quotes() {
        let config = RawInputs::new()
            .with(InputKey::Args, "--sort-by required --header-from 'docs/head er.md'")
            .normalize();
        assert_eq!(
            config.args,
            vec!["--sort-by", "required", "--header-from", "docs/head er.md"]
        );

        let config = RawInputs::new()
            .with(InputKey::Args, "--header-from 'unterminated")
            .normalize();
        assert_eq!(config.args, vec!["--header-from", "'unterminated"]);
    }

    #[test]
    fn test_output_method_parse() {
        assert_eq!(OutputMethod::parse("inject"), OutputMethod::Inject);
        assert_eq!(OutputMethod::parse("replace"), OutputMethod::Replace);
        assert_eq!(OutputMethod::parse("print"), OutputMethod::Print);
        assert_eq!(OutputMethod::parse("stdout"), OutputMethod::Print);
        assert!(!OutputMethod::Print.writes_file());
    }

    #[test]
    fn test_from_lookup() {
        let raw = RawInputs::from_lookup(|name| match name {
            "INPUT_FIND_DIR" => Some("terraform".to_string()),
            "INPUT_RECURSIVE" => Some("true".to_string()),
            _ => None,
        });
        let config = raw.normalize();
        assert_eq!(config.find_dir, Some(PathBuf::from("terraform")));
        assert!(config.recursive);
        assert_eq!(raw.get(InputKey::WorkingDir), None);
    }

    #[test]
    fn test_git_sub_dir() {
        let config = RawInputs::new().with(InputKey::GitSubDir, "infra").normalize();
        assert_eq!(config.git.sub_dir, Some(PathBuf::from("infra")));

        let config = RawInputs::new().with(InputKey::GitSubDir, ".").normalize();
        assert_eq!(config.git.sub_dir, None);
    }
}
