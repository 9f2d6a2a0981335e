use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Issuer stamped into every access token minted by this service.
pub const ISSUER: &str = "chirpy";

/// Access token claims.
///
/// Exactly the four registered claims the service relies on; no custom fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issuer, always [`ISSUER`] for tokens we mint
    pub iss: String,

    /// Subject (user id, hyphenated UUID)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid from now until `now + ttl`.
    pub fn for_user(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Whether `timestamp` falls inside `[iat, exp]`.
    pub fn is_active_at(&self, timestamp: i64) -> bool {
        self.iat <= timestamp && timestamp <= self.exp
    }
}
