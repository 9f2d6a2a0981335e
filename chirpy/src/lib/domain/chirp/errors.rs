use thiserror::Error;

/// Error type for ChirpId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChirpIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error type for ChirpBody validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChirpBodyError {
    #[error("Chirp is empty")]
    Empty,

    #[error("Chirp is too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all chirp-related operations
#[derive(Debug, Clone, Error)]
pub enum ChirpError {
    #[error("Invalid chirp ID: {0}")]
    InvalidChirpId(#[from] ChirpIdError),

    #[error("Invalid chirp: {0}")]
    InvalidBody(#[from] ChirpBodyError),

    // Domain-level errors
    #[error("Chirp not found: {0}")]
    NotFound(String),

    #[error("Chirp {0} belongs to another user")]
    Forbidden(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
