use std::sync::Arc;
use std::sync::OnceLock;

use chrono::Duration;
use uuid::Uuid;

use crate::bearer::extract_bearer;
use crate::bearer::BearerError;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::ports::CredentialStore;
use crate::ports::PersistenceError;
use crate::ports::RefreshTokenRepository;
use crate::refresh::RefreshTokenError;
use crate::refresh::RefreshTokenStore;

pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

const DUMMY_PASSWORD: &str = "chirpy-unknown-user";

/// Authentication gateway.
///
/// Composes password verification, access token signing and refresh token
/// storage into the operations request handlers call. Every failure leaving
/// this type is one of the [`AuthError`] kinds; the specific reason is logged
/// here and goes no further.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    credentials: Arc<dyn CredentialStore>,
    refresh_tokens: RefreshTokenStore,
    access_token_ttl: Duration,
    /// Verified against when the email is unknown
    dummy_hash: String,
}

/// Failures while building an [`Authenticator`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthSetupError {
    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Tokens handed out by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

/// Caller identity established from a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
}

/// Authentication failures as seen by callers.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    MalformedScheme,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BearerError> for AuthError {
    fn from(err: BearerError) -> Self {
        match err {
            BearerError::MissingHeader => AuthError::MissingCredentials,
            BearerError::MalformedScheme => AuthError::MalformedScheme,
        }
    }
}

impl From<PersistenceError> for AuthError {
    fn from(err: PersistenceError) -> Self {
        AuthError::PersistenceFailure(err.0)
    }
}

impl From<RefreshTokenError> for AuthError {
    fn from(err: RefreshTokenError) -> Self {
        match err {
            RefreshTokenError::NotFound => {
                tracing::warn!(reason = %err, "Refresh token rejected");
                AuthError::Unauthorized
            }
            RefreshTokenError::Persistence(e) => e.into(),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for access token signing
    /// * `credentials` - User lookup by email
    /// * `refresh_tokens` - Refresh token persistence
    ///
    /// # Errors
    /// * `Jwt(EmptySecret)` - `jwt_secret` is empty
    /// * `Password` - The unknown-email hash could not be computed
    pub fn new(
        jwt_secret: &[u8],
        credentials: Arc<dyn CredentialStore>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
    ) -> Result<Self, AuthSetupError> {
        let jwt_handler = JwtHandler::new(jwt_secret)?;
        let password_hasher = PasswordHasher::new();
        let dummy_hash = dummy_hash(&password_hasher)?;

        Ok(Self {
            password_hasher,
            jwt_handler,
            credentials,
            refresh_tokens: RefreshTokenStore::new(refresh_tokens),
            access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECONDS),
            dummy_hash,
        })
    }

    /// Override the access token lifetime.
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Verify credentials and issue an access and refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `PersistenceFailure` - User or token storage unreachable
    /// * `Internal` - Token signing or the blocking pool failed
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user_id = self.verify_credentials(email, password).await?;
        self.issue_tokens(user_id).await
    }

    /// Check an email and password without issuing any token.
    ///
    /// An unknown email costs the same Argon2 verification as a wrong
    /// password and fails with the same error.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `PersistenceFailure` - User storage unreachable
    /// * `Internal` - The blocking pool failed
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        let stored = self.credentials.find_by_email(email).await?;
        let user_id = stored.as_ref().map(|credentials| credentials.user_id);
        let hash = stored
            .map(|credentials| credentials.password_hash)
            .unwrap_or_else(|| self.dummy_hash.clone());

        let hasher = self.password_hasher;
        let password = password.to_string();
        let password_matches =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
                .await
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        match user_id {
            Some(user_id) if password_matches => Ok(user_id),
            Some(user_id) => {
                tracing::info!(user_id = %user_id, reason = "password mismatch", "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                tracing::info!(reason = "unknown email", "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Issue an access token and persist a fresh refresh token for `user_id`.
    ///
    /// # Errors
    /// * `PersistenceFailure` - Token storage unreachable
    /// * `Internal` - Token signing failed
    pub async fn issue_tokens(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        let access_token = self.issue_access_token(user_id)?;
        let refresh_token = self.refresh_tokens.create(user_id).await?;

        tracing::info!(user_id = %user_id, "Login succeeded");

        Ok(TokenPair {
            user_id,
            access_token,
            refresh_token: refresh_token.token,
        })
    }

    /// Resolve the caller behind an `Authorization` header carrying an access token.
    ///
    /// # Errors
    /// * `Unauthorized` - Header missing or malformed, or token rejected
    pub fn authenticate(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let token = extract_bearer(header).map_err(|e| {
            tracing::debug!(reason = %e, "Access token rejected");
            AuthError::Unauthorized
        })?;

        let user_id = self.jwt_handler.verify(token).map_err(|e| {
            tracing::warn!(reason = %e, "Access token rejected");
            AuthError::Unauthorized
        })?;

        Ok(Identity { user_id })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated and stays valid until revoked.
    ///
    /// # Errors
    /// * `MissingCredentials` / `MalformedScheme` - Header problems
    /// * `Unauthorized` - Token unknown or revoked
    /// * `PersistenceFailure` - Token storage unreachable
    pub async fn refresh(&self, header: Option<&str>) -> Result<String, AuthError> {
        let token = extract_bearer(header)?;
        let record = self.refresh_tokens.lookup(token).await?;

        if record.is_revoked() {
            tracing::warn!(user_id = %record.user_id, reason = "revoked", "Refresh token rejected");
            return Err(AuthError::Unauthorized);
        }

        self.issue_access_token(record.user_id)
    }

    /// Revoke the refresh token carried in the header.
    ///
    /// # Errors
    /// * `MissingCredentials` / `MalformedScheme` - Header problems
    /// * `Unauthorized` - Token unknown
    /// * `PersistenceFailure` - Token storage unreachable
    pub async fn revoke_session(&self, header: Option<&str>) -> Result<(), AuthError> {
        let token = extract_bearer(header)?;
        self.refresh_tokens.revoke(token).await?;

        tracing::info!("Refresh token revoked");

        Ok(())
    }

    fn issue_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.jwt_handler
            .issue(user_id, self.access_token_ttl)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

/// A real Argon2 hash of a throwaway password, computed once per process.
fn dummy_hash(hasher: &PasswordHasher) -> Result<String, PasswordError> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.clone());
    }

    let hash = hasher.hash(DUMMY_PASSWORD)?;
    Ok(DUMMY_HASH.get_or_init(|| hash).clone())
}
