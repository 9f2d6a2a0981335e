use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Argon2id password hasher.
///
/// Hashes are emitted in PHC string format, so the algorithm, its parameters
/// and the salt travel with the hash and verification needs no configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - The OS entropy source or the hasher failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// [`hash`](Self::hash) on the blocking pool, off the async workers.
    pub async fn hash_blocking(self, password: String) -> Result<String, PasswordError> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
    }

    /// Check a plaintext password against a stored PHC hash.
    ///
    /// A malformed or foreign hash is reported as a mismatch rather than an
    /// error, so a corrupt record and a wrong password look the same to callers.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
