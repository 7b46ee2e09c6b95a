//! # compatlint-core
//!
//! Checks that a Cloudflare Workers project declares the same compatibility
//! date in both places it lives:
//! - `compatibility_date` in `wrangler.toml`
//! - the dated `@cloudflare/workers-types` entry in `tsconfig.json`
//!
//! The pipeline is strictly sequential: load and parse wrangler.toml, load
//! and parse tsconfig.json, then compare under the configured [`Mode`].

pub mod compare;
pub mod config;
pub mod diagnostics;
pub mod file_utils;
pub mod parsers;
pub mod schemas;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

pub use compare::Outcome;
pub use config::{CheckConfig, Mode};
pub use diagnostics::{CheckError, CheckResult, ConfigSource, Diagnostic, DiagnosticLevel};
pub use schemas::DateLookup;

use file_utils::read_config_file;
use schemas::{tsconfig::extract_tsconfig_date, wrangler::extract_wrangler_date};

/// Result of a check run that did not fail
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub wrangler_path: PathBuf,
    pub tsconfig_path: PathBuf,
    pub wrangler_date: DateLookup,
    pub tsconfig_date: DateLookup,
    pub mode: Mode,
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// A fatal error together with what the run learned before it stopped
#[derive(Debug)]
pub struct CheckFailure {
    pub error: CheckError,
    pub wrangler_path: PathBuf,
    pub tsconfig_path: PathBuf,
    /// `None` when the run stopped before the file was read
    pub wrangler_date: Option<DateLookup>,
    pub tsconfig_date: Option<DateLookup>,
    pub mode: Mode,
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for CheckFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

/// Look up the compatibility date declared in wrangler.toml
pub fn wrangler_date(config: &CheckConfig) -> CheckResult<DateLookup> {
    let content = read_config_file(&config.wrangler_path(), ConfigSource::Wrangler)?;
    extract_wrangler_date(&content)
}

/// Look up the compatibility date declared in tsconfig.json
pub fn tsconfig_date(config: &CheckConfig) -> CheckResult<DateLookup> {
    let content = read_config_file(&config.tsconfig_path(), ConfigSource::Tsconfig)?;
    extract_tsconfig_date(&content)
}

/// Main entry point: run the full check for one project
pub fn check_project(config: &CheckConfig) -> CheckResult<CheckReport> {
    run_check(config).map_err(|failure| failure.error)
}

/// Like [`check_project`], but a failure keeps the dates and diagnostics
/// gathered before the fatal step.
pub fn run_check(config: &CheckConfig) -> Result<CheckReport, CheckFailure> {
    let wrangler_path = config.wrangler_path();
    let tsconfig_path = config.tsconfig_path();

    let failure = |error: CheckError,
                   wrangler_date: Option<DateLookup>,
                   tsconfig_date: Option<DateLookup>,
                   diagnostics: Vec<Diagnostic>| CheckFailure {
        error,
        wrangler_path: wrangler_path.clone(),
        tsconfig_path: tsconfig_path.clone(),
        wrangler_date,
        tsconfig_date,
        mode: config.mode,
        diagnostics,
    };

    let wrangler =
        wrangler_date(config).map_err(|error| failure(error, None, None, Vec::new()))?;
    let tsconfig = tsconfig_date(config)
        .map_err(|error| failure(error, Some(wrangler.clone()), None, Vec::new()))?;

    let mut diagnostics = Vec::new();
    for (lookup, path, source) in [
        (&wrangler, &wrangler_path, ConfigSource::Wrangler),
        (&tsconfig, &tsconfig_path, ConfigSource::Tsconfig),
    ] {
        if let DateLookup::Malformed(reason) = lookup {
            tracing::warn!(%source, %reason, "compatibility date could not be read");
            diagnostics.push(Diagnostic::warning(
                Some(path.clone()),
                "compat::malformed",
                format!("Compatibility date in {source} could not be read: {reason}"),
            ));
        }
    }

    let outcome = match compare::compare_dates(&wrangler, &tsconfig, config.mode) {
        Ok(outcome) => outcome,
        Err(error) => return Err(failure(error, Some(wrangler), Some(tsconfig), diagnostics)),
    };

    match &outcome {
        Outcome::InSync { date } => {
            tracing::debug!(%date, "compatibility dates match");
        }
        Outcome::MissingDate { config: source } => {
            tracing::warn!(mode = %config.mode, "mode has no action for a missing date");
            let path = match source {
                ConfigSource::Wrangler => &wrangler_path,
                ConfigSource::Tsconfig => &tsconfig_path,
            };
            diagnostics.push(
                Diagnostic::warning(
                    Some(path.clone()),
                    "compat::missing",
                    format!(
                        "Compatibility date is missing in {source}; mode '{}' takes no action",
                        config.mode
                    ),
                )
                .with_suggestion("Run with --mode fail to treat this as an error".to_string()),
            );
        }
        Outcome::InvalidDate {
            config: source,
            value,
        } => {
            tracing::warn!(
                mode = %config.mode,
                %value,
                "mode has no action for an unparseable date"
            );
            let path = match source {
                ConfigSource::Wrangler => &wrangler_path,
                ConfigSource::Tsconfig => &tsconfig_path,
            };
            diagnostics.push(
                Diagnostic::warning(
                    Some(path.clone()),
                    "compat::invalid-date",
                    format!(
                        "Compatibility date '{value}' in {source} is not a valid YYYY-MM-DD date; \
                         mode '{}' takes no action",
                        config.mode
                    ),
                )
                .with_suggestion("Use a plain YYYY-MM-DD date such as 2024-03-01".to_string()),
            );
        }
        Outcome::Drift {
            wrangler: w,
            tsconfig: t,
        } => {
            tracing::warn!(mode = %config.mode, "mode has no action for drifted dates");
            diagnostics.push(
                Diagnostic::warning(
                    None,
                    "compat::drift",
                    format!(
                        "Compatibility dates differ: wrangler config has {w}, tsconfig has {t}; \
                         mode '{}' does not edit files",
                        config.mode
                    ),
                )
                .with_suggestion(format!(
                    "Update {} or {} so both declare the same date",
                    wrangler_path.display(),
                    tsconfig_path.display()
                )),
            );
        }
    }

    Ok(CheckReport {
        wrangler_path,
        tsconfig_path,
        wrangler_date: wrangler,
        tsconfig_date: tsconfig,
        mode: config.mode,
        outcome,
        diagnostics,
    })
}
