//! TOML parser for wrangler configs

use crate::diagnostics::{CheckError, CheckResult};
use serde::de::DeserializeOwned;

/// Parse wrangler TOML into a typed view.
///
/// Any error here is fatal. Views passed as `T` should only contain optional
/// fields so that a failure can only mean broken syntax.
pub fn parse_wrangler_toml<T: DeserializeOwned>(content: &str) -> CheckResult<T> {
    toml::from_str(content).map_err(|source| CheckError::WranglerParse { source })
}
