//! GitHub Actions workflow command output.
//!
//! Emits `::debug::`, `::warning::` and `::error::` lines so a run inside a
//! workflow step is annotated the same way a JavaScript action would be.
//! https://docs.github.com/actions/using-workflows/workflow-commands-for-github-actions

use compatlint_core::{CheckFailure, CheckReport, DateLookup, Diagnostic, DiagnosticLevel, Outcome};
use std::path::Path;

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Format a single workflow command.
pub fn command(name: &str, file: Option<&Path>, message: &str) -> String {
    match file {
        Some(path) => format!(
            "::{name} file={}::{}",
            escape_property(&path.to_string_lossy().replace('\\', "/")),
            escape_data(message)
        ),
        None => format!("::{name}::{}", escape_data(message)),
    }
}

fn describe(lookup: &DateLookup) -> String {
    match lookup {
        DateLookup::Found(date) => date.clone(),
        DateLookup::NotFound => "not set".to_string(),
        DateLookup::Malformed(reason) => format!("unreadable ({reason})"),
    }
}

fn date_debug(label: &str, lookup: &DateLookup, path: &Path) -> String {
    command(
        "debug",
        None,
        &format!(
            "{label} compatibility date is {} ({})",
            describe(lookup),
            path.display()
        ),
    )
}

fn diagnostic_command(diag: &Diagnostic) -> String {
    let name = match diag.level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
        DiagnosticLevel::Info => "notice",
    };
    command(name, diag.file.as_deref(), &diag.message)
}

/// Workflow commands for a finished check.
pub fn report_to_commands(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![
        date_debug("wrangler", &report.wrangler_date, &report.wrangler_path),
        date_debug("tsconfig", &report.tsconfig_date, &report.tsconfig_path),
    ];
    lines.extend(report.diagnostics.iter().map(diagnostic_command));

    if let Outcome::InSync { date } = &report.outcome {
        lines.push(command(
            "debug",
            None,
            &format!("compatibility dates match ({date})"),
        ));
    }

    lines
}

/// Workflow commands for a failed run, ending in a single `::error::` line.
///
/// Steps that completed before the failure still get their debug lines.
pub fn failure_commands(error: &anyhow::Error) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(failure) = error.downcast_ref::<CheckFailure>() {
        if let Some(lookup) = &failure.wrangler_date {
            lines.push(date_debug("wrangler", lookup, &failure.wrangler_path));
        }
        if let Some(lookup) = &failure.tsconfig_date {
            lines.push(date_debug("tsconfig", lookup, &failure.tsconfig_path));
        }
        lines.extend(failure.diagnostics.iter().map(diagnostic_command));
    }

    lines.push(command("error", None, &error.to_string()));
    lines
}
