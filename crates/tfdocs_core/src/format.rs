//! terraform-docs output format selection.
//!
//! The `output-format` input is a formatter name optionally followed by a
//! variant (`markdown table`, `tfvars hcl`). Known combinations are parsed
//! into a structured value; anything else is kept as raw whitespace-separated
//! tokens and handed to terraform-docs unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Formatter understood by terraform-docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Asciidoc,
    Markdown,
    Json,
    Pretty,
    Tfvars,
    Toml,
    Xml,
    Yaml,
}

impl FormatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asciidoc => "asciidoc",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Tfvars => "tfvars",
            Self::Toml => "toml",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "asciidoc" => Self::Asciidoc,
            "markdown" => Self::Markdown,
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            "tfvars" => Self::Tfvars,
            "toml" => Self::Toml,
            "xml" => Self::Xml,
            "yaml" => Self::Yaml,
            _ => return None,
        })
    }
}

/// Sub-format of a formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVariant {
    Table,
    Document,
    Hcl,
    Json,
}

impl FormatVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Document => "document",
            Self::Hcl => "hcl",
            Self::Json => "json",
        }
    }

    fn parse_for(kind: FormatKind, s: &str) -> Option<Self> {
        match (kind, s) {
            (FormatKind::Asciidoc | FormatKind::Markdown, "table") => Some(Self::Table),
            (FormatKind::Asciidoc | FormatKind::Markdown, "document") => Some(Self::Document),
            (FormatKind::Tfvars, "hcl") => Some(Self::Hcl),
            (FormatKind::Tfvars, "json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Output format passed as the leading positional arguments to terraform-docs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputFormat {
    /// A formatter terraform-docs documents, with an optional variant.
    Known {
        kind: FormatKind,
        variant: Option<FormatVariant>,
    },
    /// Any other value, split on whitespace and passed through.
    Raw { tokens: Vec<String> },
}

impl OutputFormat {
    pub fn new(kind: FormatKind, variant: Option<FormatVariant>) -> Self {
        Self::Known { kind, variant }
    }

    /// Parse an `output-format` input value.
    pub fn parse(value: &str) -> Self {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let known = match tokens.as_slice() {
            [kind] => FormatKind::parse(kind)
                .filter(|k| *k != FormatKind::Tfvars)
                .map(|kind| Self::Known { kind, variant: None }),
            [kind, variant] => FormatKind::parse(kind).and_then(|kind| {
                FormatVariant::parse_for(kind, variant).map(|variant| Self::Known {
                    kind,
                    variant: Some(variant),
                })
            }),
            _ => None,
        };

        known.unwrap_or_else(|| Self::Raw {
            tokens: tokens.into_iter().map(str::to_string).collect(),
        })
    }

    /// Positional arguments for the terraform-docs command line.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Known { kind, variant } => {
                let mut tokens = vec![kind.as_str().to_string()];
                if let Some(variant) = variant {
                    tokens.push(variant.as_str().to_string());
                }
                tokens
            }
            Self::Raw { tokens } => tokens.clone(),
        }
    }

    /// Whether terraform-docs accepts `--indent` for this format.
    pub fn supports_indent(&self) -> bool {
        matches!(
            self,
            Self::Known {
                kind: FormatKind::Asciidoc | FormatKind::Markdown,
                variant: None | Some(FormatVariant::Table) | Some(FormatVariant::Document),
            }
        )
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(FormatKind::Markdown, Some(FormatVariant::Table))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().join(" "))
    }
}
