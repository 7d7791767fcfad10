//! Gate error types

use thiserror::Error;

/// Errors raised while evaluating a push.
///
/// None of these are per-commit validation failures; those are carried by
/// [`crate::CommitState`]. Every variant here is terminal for the invocation.
#[derive(Debug, Error)]
pub enum GateError {
    /// Hook input could not be parsed
    #[error("Invalid push input: {0}")]
    InvalidInput(String),

    /// Missing or malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A version-control query failed
    #[error("Version control error: {0}")]
    VersionControl(String),

    /// The hosting platform's project API failed
    #[error("Project API error: {0}")]
    ProjectApi(String),

    /// The validation service could not be reached
    #[error("Validation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The validation service returned a body that is not a validation response
    #[error("Malformed validation response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Result type for gate operations
pub type GateResult<T> = Result<T, GateError>;
