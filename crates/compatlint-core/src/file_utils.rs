//! Config file loading
//!
//! Reads a configuration file as UTF-8 text, rejecting directories and other
//! non-regular files and anything over a size limit. Every failure is mapped
//! to a fatal [`CheckError`] that names the file and path.

use crate::diagnostics::{CheckError, CheckResult, ConfigSource};
use std::fs;
use std::io;
use std::path::Path;

/// Default maximum config file size (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Read a config file for the given source.
///
/// # Errors
///
/// Returns `CheckError::ConfigNotFound` when the file is missing, unreadable,
/// not a regular file, or not valid UTF-8, and `CheckError::ConfigTooBig`
/// when it exceeds [`DEFAULT_MAX_FILE_SIZE`].
pub fn read_config_file(path: &Path, config: ConfigSource) -> CheckResult<String> {
    read_config_file_with_limit(path, config, DEFAULT_MAX_FILE_SIZE)
}

/// Read a config file with a custom size limit.
///
/// Files at exactly `max_size` bytes are accepted.
pub fn read_config_file_with_limit(
    path: &Path,
    config: ConfigSource,
    max_size: u64,
) -> CheckResult<String> {
    tracing::debug!(path = %path.display(), "reading {}", config);

    let not_found = |source: io::Error| CheckError::ConfigNotFound {
        config,
        path: path.to_path_buf(),
        source,
    };

    // Follows symlinks: a linked wrangler.toml is a normal setup
    let metadata = fs::metadata(path).map_err(not_found)?;

    if !metadata.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let size = metadata.len();
    if size > max_size {
        return Err(CheckError::ConfigTooBig {
            config,
            path: path.to_path_buf(),
            size,
            limit: max_size,
        });
    }

    fs::read_to_string(path).map_err(not_found)
}
