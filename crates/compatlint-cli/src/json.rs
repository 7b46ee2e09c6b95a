//! JSON output format support.
//!
//! One JSON object per run, for both successful and failed checks.

use compatlint_core::{CheckFailure, CheckReport, DateLookup, Diagnostic, DiagnosticLevel, Outcome};
use serde::Serialize;
use std::path::Path;

/// Root structure for JSON output.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// Version of compatlint that produced this output.
    pub version: String,
    /// in-sync, drift, missing-date, invalid-date or failed.
    pub status: &'static str,
    /// Mode the check ran in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrangler: Option<JsonSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<JsonSource>,
    /// Non-fatal findings.
    pub diagnostics: Vec<JsonDiagnostic>,
    /// The fatal failure, if the run failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One config file and what was found in it.
#[derive(Debug, Serialize)]
pub struct JsonSource {
    /// File path (forward slashes for cross-platform consistency).
    pub path: String,
    /// The declared compatibility date, if any.
    pub date: Option<String>,
    /// Why the date could not be read, if the field was malformed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
}

/// A single diagnostic in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub level: &'static str,
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

fn level_to_string(level: DiagnosticLevel) -> &'static str {
    match level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
        DiagnosticLevel::Info => "info",
    }
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn source_to_json(path: &Path, lookup: &DateLookup) -> JsonSource {
    JsonSource {
        path: path_to_string(path),
        date: lookup.date().map(str::to_string),
        malformed: match lookup {
            DateLookup::Malformed(reason) => Some(reason.clone()),
            _ => None,
        },
    }
}

fn diagnostic_to_json(diag: &Diagnostic) -> JsonDiagnostic {
    JsonDiagnostic {
        level: level_to_string(diag.level),
        rule: diag.rule.clone(),
        file: diag.file.as_deref().map(path_to_string),
        message: diag.message.clone(),
        suggestion: diag.suggestion.clone(),
    }
}

/// Convert a finished check to JSON output format.
pub fn report_to_json(report: &CheckReport) -> JsonOutput {
    let status = match report.outcome {
        Outcome::InSync { .. } => "in-sync",
        Outcome::Drift { .. } => "drift",
        Outcome::MissingDate { .. } => "missing-date",
        Outcome::InvalidDate { .. } => "invalid-date",
    };

    JsonOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status,
        mode: Some(report.mode.to_string()),
        wrangler: Some(source_to_json(&report.wrangler_path, &report.wrangler_date)),
        tsconfig: Some(source_to_json(&report.tsconfig_path, &report.tsconfig_date)),
        diagnostics: report.diagnostics.iter().map(diagnostic_to_json).collect(),
        error: None,
    }
}

/// JSON output for a run that stopped on a fatal error.
///
/// A check failure also carries the dates read and the diagnostics raised
/// before the fatal step.
pub fn failure_to_json(error: &anyhow::Error) -> JsonOutput {
    let mut output = JsonOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "failed",
        mode: None,
        wrangler: None,
        tsconfig: None,
        diagnostics: Vec::new(),
        error: Some(error.to_string()),
    };

    if let Some(failure) = error.downcast_ref::<CheckFailure>() {
        output.mode = Some(failure.mode.to_string());
        output.wrangler = failure
            .wrangler_date
            .as_ref()
            .map(|lookup| source_to_json(&failure.wrangler_path, lookup));
        output.tsconfig = failure
            .tsconfig_date
            .as_ref()
            .map(|lookup| source_to_json(&failure.tsconfig_path, lookup));
        output.diagnostics = failure.diagnostics.iter().map(diagnostic_to_json).collect();
    }

    output
}
