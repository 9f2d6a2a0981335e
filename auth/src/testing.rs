use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::ports::PersistenceError;
use crate::ports::RefreshTokenRepository;
use crate::refresh::RefreshToken;

/// Refresh token repository backed by a map, for unit tests.
#[derive(Default)]
pub struct InMemoryRefreshTokens {
    tokens: Mutex<HashMap<String, RefreshToken>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryRefreshTokens {
    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), PersistenceError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(PersistenceError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokens {
    async fn insert(&self, token: &RefreshToken) -> Result<(), PersistenceError> {
        self.check()?;
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.contains_key(&token.token) {
            return Err(PersistenceError("duplicate refresh token".to_string()));
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshToken>, PersistenceError> {
        self.check()?;
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn revoke(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, PersistenceError> {
        self.check()?;
        match self.tokens.lock().unwrap().get_mut(token) {
            Some(record) => {
                record.revoked_at.get_or_insert(revoked_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
