//! JSON parser for tsconfig files

use crate::diagnostics::{CheckError, CheckResult};

/// Parse tsconfig text into a JSON document.
///
/// Only syntax is checked. tsconfig files with comments or trailing commas
/// are rejected like any other invalid JSON.
pub fn parse_tsconfig_json(content: &str) -> CheckResult<serde_json::Value> {
    serde_json::from_str(content).map_err(|source| CheckError::TsconfigParse { source })
}
