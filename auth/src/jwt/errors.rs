use thiserror::Error;

/// Reasons an access token could not be minted or accepted.
///
/// Kept fine-grained for logs; callers outside the crate only ever see
/// `AuthError::Unauthorized` for the verification variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Signing secret is empty")]
    EmptySecret,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token algorithm is not accepted")]
    AlgorithmMismatch,

    #[error("Token issuer is not accepted")]
    InvalidIssuer,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is not yet valid")]
    NotYetValid,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Token subject is not a user id: {0}")]
    InvalidSubject(String),
}
