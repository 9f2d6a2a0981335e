use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::Claims;
use super::claims::ISSUER;
use super::errors::JwtError;

/// Access token codec.
///
/// Signs and verifies HS256 tokens with a single process-wide secret. Holds no
/// other state, so one instance can be shared freely across request tasks.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a codec bound to `secret`.
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is empty; signing with an empty key is refused
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        let mut validation = Validation::new(Self::ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Mint an access token for `user_id` that expires after `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        self.encode(&Claims::for_user(user_id, ttl))
    }

    /// Sign arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Self::ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return the user id it was issued for.
    ///
    /// Rejects foreign algorithms, foreign issuers, tokens outside
    /// `[iat, exp]` and subjects that are not UUIDs.
    pub fn verify(&self, token: &str) -> Result<Uuid, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::ImmatureSignature => JwtError::NotYetValid,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    JwtError::AlgorithmMismatch
                }
                ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
                _ => JwtError::Malformed(e.to_string()),
            })?;

        // jsonwebtoken leaves `iat` unchecked
        let now = Utc::now().timestamp();
        if !claims.is_active_at(now) {
            return Err(if claims.iat > now {
                JwtError::NotYetValid
            } else {
                JwtError::TokenExpired
            });
        }

        Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidSubject(claims.sub))
    }
}
