use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::errors::RefreshTokenError;
use super::models::RefreshToken;
use crate::ports::RefreshTokenRepository;

/// Create, look up and revoke refresh tokens through a repository.
#[derive(Clone)]
pub struct RefreshTokenStore {
    repository: Arc<dyn RefreshTokenRepository>,
}

impl RefreshTokenStore {
    pub fn new(repository: Arc<dyn RefreshTokenRepository>) -> Self {
        Self { repository }
    }

    /// Mint and persist a new token bound to `user_id`.
    ///
    /// # Errors
    /// * `Persistence` - Storage unreachable
    pub async fn create(&self, user_id: Uuid) -> Result<RefreshToken, RefreshTokenError> {
        let token = RefreshToken::generate(user_id);
        self.repository.insert(&token).await?;

        tracing::debug!(user_id = %user_id, "Refresh token created");

        Ok(token)
    }

    /// Fetch a token record. Revoked tokens are returned too; callers decide.
    ///
    /// # Errors
    /// * `NotFound` - No such token
    /// * `Persistence` - Storage unreachable
    pub async fn lookup(&self, token: &str) -> Result<RefreshToken, RefreshTokenError> {
        self.repository
            .find(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)
    }

    /// Revoke a token. Revoking an already revoked token succeeds.
    ///
    /// # Errors
    /// * `NotFound` - No such token
    /// * `Persistence` - Storage unreachable
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        if self.repository.revoke(token, Utc::now()).await? {
            Ok(())
        } else {
            Err(RefreshTokenError::NotFound)
        }
    }
}
