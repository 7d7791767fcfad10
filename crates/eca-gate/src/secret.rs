//! Access token loading.

use std::fs;
use std::path::Path;

use crate::error::{CliError, CliResult};

/// Read the API token stored at `path`, trimming surrounding whitespace.
///
/// A missing, unreadable or blank file is an error; the hook never calls
/// the API unauthenticated.
pub fn read_token(path: impl AsRef<Path>) -> CliResult<String> {
    let path = path.as_ref();
    let missing = |reason: String| CliError::MissingSecret {
        path: path.display().to_string(),
        reason,
    };

    let raw = fs::read_to_string(path).map_err(|e| missing(e.to_string()))?;
    let token = raw.trim();
    if token.is_empty() {
        return Err(missing("file is empty".into()));
    }
    Ok(token.to_string())
}
