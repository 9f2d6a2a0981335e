use thiserror::Error;

/// Scheme prefix expected at the start of an `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a credential could not be pulled out of an `Authorization` header.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    MalformedScheme,
}

/// Extract the credential from an `Authorization` header value.
///
/// The remainder after `"Bearer "` is returned verbatim; whatever whitespace
/// it carries is left for the token verifier to reject.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, BearerError> {
    let value = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(BearerError::MissingHeader),
    };

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::MalformedScheme)
}
