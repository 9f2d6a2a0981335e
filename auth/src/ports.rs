use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::refresh::RefreshToken;

/// Storage failure reported by a persistence collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Persistence failure: {0}")]
pub struct PersistenceError(pub String);

/// What login needs to know about a registered user.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

/// User lookup consumed by login.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve the credentials registered under `email`.
    ///
    /// # Returns
    /// Optional credentials (None if no user has this email)
    ///
    /// # Errors
    /// * `PersistenceError` - Storage unreachable
    async fn find_by_email(&self, email: &str)
        -> Result<Option<StoredCredentials>, PersistenceError>;
}

/// Persistence operations for refresh tokens.
///
/// Implementations must make a completed `revoke` visible to every `find`
/// issued after it returns.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a newly minted token.
    ///
    /// # Errors
    /// * `PersistenceError` - Storage unreachable or token already present
    async fn insert(&self, token: &RefreshToken) -> Result<(), PersistenceError>;

    /// Retrieve a token record, revoked or not.
    ///
    /// # Errors
    /// * `PersistenceError` - Storage unreachable
    async fn find(&self, token: &str) -> Result<Option<RefreshToken>, PersistenceError>;

    /// Mark a token revoked at `revoked_at`, keeping any earlier revocation time.
    ///
    /// # Returns
    /// `true` if the token exists, `false` otherwise
    ///
    /// # Errors
    /// * `PersistenceError` - Storage unreachable
    async fn revoke(&self, token: &str, revoked_at: DateTime<Utc>)
        -> Result<bool, PersistenceError>;
}
