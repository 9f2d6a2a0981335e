//! Authentication core for the chirpy service
//!
//! - Password hashing (Argon2id)
//! - Access tokens: short-lived HS256 JWTs, verified without storage
//! - Refresh tokens: opaque random strings, persisted and revocable
//! - Bearer header extraction
//! - [`Authenticator`], composing the above into login, authenticate, refresh
//!   and revoke
//!
//! Storage is reached only through the traits in [`ports`], so the crate has
//! no database or HTTP dependency.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let user_id = Uuid::new_v4();
//! let token = handler.issue(user_id, Duration::hours(1)).unwrap();
//! assert_eq!(handler.verify(&token).unwrap(), user_id);
//! ```
//!
//! ## Bearer Extraction
//! ```
//! use auth::extract_bearer;
//!
//! assert_eq!(extract_bearer(Some("Bearer abc")), Ok("abc"));
//! assert!(extract_bearer(Some("Token abc")).is_err());
//! ```

pub mod authenticator;
pub mod bearer;
pub mod jwt;
pub mod password;
pub mod ports;
pub mod refresh;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use authenticator::AuthError;
pub use authenticator::AuthSetupError;
pub use authenticator::Authenticator;
pub use authenticator::Identity;
pub use authenticator::TokenPair;
pub use authenticator::DEFAULT_ACCESS_TOKEN_TTL_SECONDS;
pub use bearer::extract_bearer;
pub use bearer::BearerError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use ports::CredentialStore;
pub use ports::PersistenceError;
pub use ports::RefreshTokenRepository;
pub use ports::StoredCredentials;
pub use refresh::RefreshToken;
pub use refresh::RefreshTokenError;
pub use refresh::RefreshTokenStore;
