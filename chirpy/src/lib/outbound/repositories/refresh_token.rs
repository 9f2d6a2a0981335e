use async_trait::async_trait;
use auth::PersistenceError;
use auth::RefreshToken;
use auth::RefreshTokenRepository;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(r: RefreshTokenRow) -> Self {
        RefreshToken {
            token: r.token,
            user_id: r.user_id,
            created_at: r.created_at,
            revoked_at: r.revoked_at,
        }
    }
}

fn persistence_error(e: sqlx::Error) -> PersistenceError {
    PersistenceError(e.to_string())
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, created_at, revoked_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.revoked_at)
        .execute(&self.pool)
        .await
        .map_err(persistence_error)?;

        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshToken>, PersistenceError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT token, user_id, created_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_error)?;

        Ok(row.map(RefreshToken::from))
    }

    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool, PersistenceError> {
        // Keeps the first revocation time on repeat calls
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = COALESCE(revoked_at, $2)
            WHERE token = $1
            "#,
        )
        .bind(token)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(persistence_error)?;

        Ok(result.rows_affected() > 0)
    }
}
