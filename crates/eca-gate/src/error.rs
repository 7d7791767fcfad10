//! Hook error types

use eca_gate_core::GateError;
use thiserror::Error;

/// Errors that end the hook with the generic internal-error message.
#[derive(Debug, Error)]
pub enum CliError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API error response
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Access token unavailable
    #[error("Access token unavailable at {path}: {reason}")]
    MissingSecret { path: String, reason: String },

    /// Error raised while evaluating the push
    #[error(transparent)]
    Gate(#[from] GateError),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

/// Collaborator failures surface to the core as the matching [`GateError`].
impl From<CliError> for GateError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Gate(inner) => inner,
            CliError::Http(e) => GateError::ProjectApi(e.to_string()),
            CliError::Api { status, message } => {
                GateError::ProjectApi(format!("status {}: {}", status, message))
            }
            CliError::Config(msg) => GateError::Config(msg),
            secret @ CliError::MissingSecret { .. } => GateError::Config(secret.to_string()),
        }
    }
}

/// Result type for hook operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_project_api() {
        let err = GateError::from(CliError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        });
        assert!(matches!(err, GateError::ProjectApi(ref msg) if msg == "status 502: Bad Gateway"));
    }

    #[test]
    fn test_missing_secret_maps_to_config() {
        let err = GateError::from(CliError::MissingSecret {
            path: "/etc/gitlab/eca-access-token".into(),
            reason: "file is empty".into(),
        });
        assert!(
            matches!(err, GateError::Config(ref msg) if msg.contains("/etc/gitlab/eca-access-token"))
        );
    }

    #[test]
    fn test_gate_error_passes_through() {
        let err = GateError::from(CliError::Gate(GateError::VersionControl("bad".into())));
        assert!(matches!(err, GateError::VersionControl(ref msg) if msg == "bad"));

        let err = GateError::from(CliError::Config("no repository".into()));
        assert!(matches!(err, GateError::Config(_)));
    }
}
