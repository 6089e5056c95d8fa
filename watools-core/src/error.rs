//! Error types for the watools ecosystem.

use thiserror::Error;

/// Errors that can occur in watools operations.
#[derive(Error, Debug)]
pub enum WaToolsError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No event matching \"{0}\" was found")]
    EventNotFound(String),

    #[error("No registration type matching \"{wanted}\". Available: {}", .available.join(", "))]
    RegistrationTypeNotFound {
        wanted: String,
        available: Vec<String>,
    },

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Cancelled while waiting for registration to open")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for watools operations.
pub type WaToolsResult<T> = Result<T, WaToolsError>;
