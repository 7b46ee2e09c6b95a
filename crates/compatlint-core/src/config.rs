//! Checker configuration

use crate::diagnostics::{CheckError, CheckResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".compatlint.toml";

/// Configuration for a check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Directory the two config paths are resolved against
    pub basedir: PathBuf,

    /// wrangler.toml path, relative to `basedir`
    pub wrangler_toml: PathBuf,

    /// tsconfig.json path, relative to `basedir`
    pub tsconfig_json: PathBuf,

    /// What to do when a date is missing or the dates drift apart
    pub mode: Mode,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            basedir: PathBuf::from("."),
            wrangler_toml: PathBuf::from("wrangler.toml"),
            tsconfig_json: PathBuf::from("tsconfig.json"),
            mode: Mode::default(),
        }
    }
}

/// Behaviour selected for missing dates and drift.
///
/// Only `Fail` turns findings into failures. The edit modes are accepted
/// but do not modify any file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Fail,
    EditWranglerToml,
    EditTsconfig,
    #[default]
    EditOld,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::Fail,
        Mode::EditWranglerToml,
        Mode::EditTsconfig,
        Mode::EditOld,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Fail => "fail",
            Mode::EditWranglerToml => "edit-wrangler-toml",
            Mode::EditTsconfig => "edit-tsconfig",
            Mode::EditOld => "edit-old",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == trimmed)
            .ok_or_else(|| CheckError::UnknownMode(s.to_string()))
    }
}

impl CheckConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> CheckResult<Self> {
        let load_err = |source: anyhow::Error| CheckError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.into()))?;
        toml::from_str(&content).map_err(|e| load_err(e.into()))
    }

    /// Load the explicit config file, else `.compatlint.toml` in `cwd` if it
    /// exists, else defaults. An explicit path that cannot be loaded is an error.
    pub fn load_or_default(explicit: Option<&Path>, cwd: &Path) -> CheckResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let implicit = cwd.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            tracing::debug!(path = %implicit.display(), "using config file");
            return Self::load(&implicit);
        }

        Ok(Self::default())
    }

    /// Resolved wrangler.toml path
    pub fn wrangler_path(&self) -> PathBuf {
        self.basedir.join(&self.wrangler_toml)
    }

    /// Resolved tsconfig.json path
    pub fn tsconfig_path(&self) -> PathBuf {
        self.basedir.join(&self.tsconfig_json)
    }
}
