//! Error types for lab submissions.

use thiserror::Error;

/// Why a lab submission produced no result.
///
/// Every variant is shown to the learner as-is in place of the result,
/// so messages are phrased for people, not logs.
#[derive(Error, Debug)]
pub enum LabError {
    /// The credential environment variable is unset or empty. Detected
    /// before any network call.
    #[error("API Key missing. Please set your {env_var} in the environment.")]
    MissingCredential { env_var: String },

    #[error("AI service is disabled in configuration")]
    Disabled,

    #[error("context must not be empty")]
    EmptyContext,

    /// Network or transport failure.
    #[error("AI request failed: {0}")]
    Request(String),

    /// Non-success HTTP status from the AI service.
    #[error("AI service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("AI service returned an empty reply")]
    EmptyReply,

    #[error("AI reply is not valid JSON: {0}")]
    NotJson(String),

    /// The reply parsed as JSON but carries none of the known result fields.
    #[error("AI reply has an unrecognized shape (keys: {})", .0.join(", "))]
    UnrecognizedShape(Vec<String>),

    #[error("AI reply field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// The reply itself reported an error.
    #[error("{0}")]
    Service(String),

    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Invalid auxiliary selection for a task control.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("missing selection '{0}'")]
    Missing(&'static str),

    #[error("'{value}' is not a valid {field}; expected one of: {}", .allowed.join(", "))]
    Invalid {
        field: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },
}
