use thiserror::Error;

use crate::ports::PersistenceError;

/// Error type for refresh token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Refresh token not found")]
    NotFound,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
