use chrono::DateTime;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

/// Random bytes behind every refresh token.
pub const TOKEN_BYTES: usize = 32;

/// Persisted refresh token record.
///
/// Never expires on its own; `revoked_at` moves from `None` to `Some` once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Mint a fresh, unrevoked token for `user_id`.
    pub fn generate(user_id: Uuid) -> Self {
        Self {
            token: generate_token(),
            user_id,
            created_at: Utc::now(),
            revoked_at: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// 32 bytes from the OS RNG, lowercase hex.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
