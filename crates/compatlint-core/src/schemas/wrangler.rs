//! wrangler.toml schema

use super::DateLookup;
use crate::diagnostics::CheckResult;
use crate::parsers::toml_file::parse_wrangler_toml;
use serde::Deserialize;

/// Shallow wrangler.toml view. Every other key is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WranglerConfig {
    pub compatibility_date: Option<toml::Value>,
}

impl WranglerConfig {
    pub fn compatibility_date(&self) -> DateLookup {
        match &self.compatibility_date {
            None => DateLookup::NotFound,
            Some(toml::Value::String(date)) => DateLookup::Found(date.clone()),
            // Bare `compatibility_date = 2024-01-15` is a TOML local date
            Some(toml::Value::Datetime(dt)) if dt.date.is_some() && dt.time.is_none() => {
                DateLookup::Found(dt.to_string())
            }
            Some(other) => DateLookup::Malformed(format!(
                "compatibility_date is a {}, expected a string",
                other.type_str()
            )),
        }
    }
}

/// Parse wrangler.toml text and extract its compatibility date.
///
/// Broken TOML is fatal. A missing or oddly typed field is not.
pub fn extract_wrangler_date(content: &str) -> CheckResult<DateLookup> {
    tracing::debug!("parsing wrangler configuration");
    let config: WranglerConfig = parse_wrangler_toml(content)?;
    let lookup = config.compatibility_date();
    tracing::debug!(?lookup, "wrangler compatibility date");
    Ok(lookup)
}
