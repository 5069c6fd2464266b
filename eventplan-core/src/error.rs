//! Error types for eventplan.

use thiserror::Error;

/// Errors that can occur in eventplan operations.
///
/// Store mutations themselves never fail; these come from configuration,
/// persistence, and user input that is rejected before it reaches the store.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::Serialization(e.to_string())
    }
}

/// A rejected submission. Nothing is written when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid email: '{0}'")]
    InvalidEmail(String),

    #[error("Invalid phone number: '{0}' (expected 10 or 11 digits)")]
    InvalidPhone(String),

    #[error("Invalid price: '{0}' (expected a positive amount)")]
    InvalidPrice(String),

    #[error("Invalid event type: '{0}' (expected festa or colaborativo)")]
    InvalidKind(String),

    #[error("Invalid guest status: '{0}' (expected pending, confirmed or declined)")]
    InvalidStatus(String),

    #[error("No guests given (expected one \"Name, Email, Phone\" per line)")]
    EmptyBatch,

    #[error("Line {line}: {source}")]
    BulkLine {
        line: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Result type alias for eventplan operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
