//! Diagnostic types and error reporting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type CheckResult<T> = Result<T, CheckError>;

/// Which of the two configuration files a value or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigSource {
    /// wrangler.toml
    Wrangler,
    /// tsconfig.json
    Tsconfig,
}

impl ConfigSource {
    pub fn label(self) -> &'static str {
        match self {
            ConfigSource::Wrangler => "wrangler config",
            ConfigSource::Tsconfig => "tsconfig",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A non-fatal finding attached to a check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub file: Option<PathBuf>,
    pub rule: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

impl Diagnostic {
    pub fn warning(file: Option<PathBuf>, rule: &str, message: String) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message,
            file,
            rule: rule.to_string(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }
}

/// Fatal checker errors. Each one halts the run.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{} not found at {}", not_found_subject(.config), .path.display())]
    ConfigNotFound {
        config: ConfigSource,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} at {} is larger than {limit} bytes", .config, .path.display())]
    ConfigTooBig {
        config: ConfigSource,
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Failed to parse wrangler configuration")]
    WranglerParse {
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse tsconfig")]
    TsconfigParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Compatibility date is missing in {config}")]
    MissingDate { config: ConfigSource },

    #[error("Compatibility date '{value}' in {config} is not a valid YYYY-MM-DD date")]
    InvalidDate { config: ConfigSource, value: String },

    #[error("Compatibility dates differ: wrangler config has {wrangler}, tsconfig has {tsconfig}")]
    DateDrift { wrangler: String, tsconfig: String },

    #[error("Unknown mode '{0}' (expected fail, edit-wrangler-toml, edit-tsconfig or edit-old)")]
    UnknownMode(String),

    #[error("Failed to load config file: {}", .path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

fn not_found_subject(config: &ConfigSource) -> &'static str {
    match config {
        ConfigSource::Wrangler => "Wrangler configuration",
        ConfigSource::Tsconfig => "tsconfig",
    }
}
