//! Date comparison and mode dispatch

use crate::config::Mode;
use crate::diagnostics::{CheckError, CheckResult, ConfigSource};
use crate::schemas::DateLookup;
use chrono::NaiveDate;
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Non-fatal result of comparing the two dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// Both files declare the same date
    InSync { date: String },
    /// The dates differ and the mode does not fail on it
    Drift { wrangler: String, tsconfig: String },
    /// A date is missing and the mode does not fail on it
    MissingDate { config: ConfigSource },
    /// A date is not `YYYY-MM-DD` and the mode does not fail on it
    InvalidDate { config: ConfigSource, value: String },
}

impl Outcome {
    pub fn is_in_sync(&self) -> bool {
        matches!(self, Outcome::InSync { .. })
    }
}

/// Convert a declared date to a calendar date
pub fn parse_date(value: &str, config: ConfigSource) -> CheckResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| CheckError::InvalidDate {
        config,
        value: value.to_string(),
    })
}

/// Decide the outcome for two lookups under `mode`.
///
/// `Malformed` counts as missing. In `Mode::Fail` a missing date, an
/// unparseable date or drift is returned as an error; the edit modes never
/// edit and report the finding as an outcome instead.
pub fn compare_dates(
    wrangler: &DateLookup,
    tsconfig: &DateLookup,
    mode: Mode,
) -> CheckResult<Outcome> {
    let (wrangler_date, tsconfig_date) = match (wrangler.date(), tsconfig.date()) {
        (Some(w), Some(t)) => (w, t),
        (w, _) => {
            let config = if w.is_some() {
                ConfigSource::Tsconfig
            } else {
                ConfigSource::Wrangler
            };
            return match mode {
                Mode::Fail => Err(CheckError::MissingDate { config }),
                _ => Ok(Outcome::MissingDate { config }),
            };
        }
    };

    let parsed = parse_date(wrangler_date, ConfigSource::Wrangler)
        .and_then(|w| Ok((w, parse_date(tsconfig_date, ConfigSource::Tsconfig)?)));
    let (w, t) = match parsed {
        Ok(dates) => dates,
        Err(CheckError::InvalidDate { config, value }) if mode != Mode::Fail => {
            return Ok(Outcome::InvalidDate { config, value });
        }
        Err(err) => return Err(err),
    };
    tracing::debug!(wrangler = %w, tsconfig = %t, "comparing compatibility dates");

    if w == t {
        return Ok(Outcome::InSync {
            date: w.format(DATE_FORMAT).to_string(),
        });
    }

    match mode {
        Mode::Fail => Err(CheckError::DateDrift {
            wrangler: wrangler_date.to_string(),
            tsconfig: tsconfig_date.to_string(),
        }),
        _ => Ok(Outcome::Drift {
            wrangler: wrangler_date.to_string(),
            tsconfig: tsconfig_date.to_string(),
        }),
    }
}
