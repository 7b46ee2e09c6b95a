//! tsconfig.json schema

use super::DateLookup;
use crate::diagnostics::CheckResult;
use crate::parsers::json::parse_tsconfig_json;
use serde::Deserialize;

/// Package whose versioned entrypoints carry the compatibility date
pub const WORKERS_TYPES_PACKAGE: &str = "@cloudflare/workers-types";

/// Path segment used by the experimental entrypoints
pub const EXPERIMENTAL_MARKER: &str = "experimental";

/// Shallow tsconfig view
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tsconfig {
    #[serde(rename = "compilerOptions")]
    pub compiler_options: Option<CompilerOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerOptions {
    pub types: Option<Vec<String>>,
}

impl Tsconfig {
    /// First workers-types entry in `compilerOptions.types`
    pub fn workers_types_entry(&self) -> Option<&str> {
        self.compiler_options
            .as_ref()?
            .types
            .as_ref()?
            .iter()
            .map(String::as_str)
            .find(|entry| entry.starts_with(WORKERS_TYPES_PACKAGE))
    }

    pub fn compatibility_date(&self) -> DateLookup {
        self.workers_types_entry()
            .and_then(date_from_entry)
            .map_or(DateLookup::NotFound, |date| DateLookup::Found(date.to_string()))
    }
}

/// Pull the date out of an entry such as
/// `@cloudflare/workers-types/experimental/2024-03-01`.
///
/// Returns `None` when nothing is left after stripping.
pub fn date_from_entry(entry: &str) -> Option<&str> {
    let rest = entry.strip_prefix(WORKERS_TYPES_PACKAGE)?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let rest = rest.strip_prefix(EXPERIMENTAL_MARKER).unwrap_or(rest);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    (!rest.is_empty()).then_some(rest)
}

/// Parse tsconfig text and extract the date from its workers-types entry.
///
/// Broken JSON is fatal. A document that does not match the shallow view
/// (e.g. `types` is not a list of strings) yields `Malformed`.
pub fn extract_tsconfig_date(content: &str) -> CheckResult<DateLookup> {
    tracing::debug!("parsing tsconfig");
    let document = parse_tsconfig_json(content)?;

    let tsconfig: Tsconfig = match serde_json::from_value(document) {
        Ok(tsconfig) => tsconfig,
        Err(e) => {
            tracing::debug!(error = %e, "tsconfig does not match the expected shape");
            return Ok(DateLookup::Malformed(e.to_string()));
        }
    };

    let lookup = tsconfig.compatibility_date();
    tracing::debug!(?lookup, "tsconfig compatibility date");
    Ok(lookup)
}
