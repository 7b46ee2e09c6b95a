//! Typed views over the two config files

pub mod tsconfig;
pub mod wrangler;

use serde::Serialize;

/// Result of looking up a compatibility date in one config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "kebab-case")]
pub enum DateLookup {
    /// The date string as declared
    Found(String),
    /// The file does not declare a date
    NotFound,
    /// The file has the field but in a shape we cannot read
    Malformed(String),
}

impl DateLookup {
    /// The date, if one was found
    pub fn date(&self) -> Option<&str> {
        match self {
            DateLookup::Found(date) => Some(date),
            DateLookup::NotFound | DateLookup::Malformed(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, DateLookup::Found(_))
    }
}
