use sqlx::PgPool;
use uuid::Uuid;

/// Repository for opaque bearer tokens. Only the SHA-256 digest of a
/// token is stored; the plaintext is returned to the client once at
/// issuance.
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, token_digest: &str, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (token_digest, user_id, created_at)
            VALUES ($1, $2, NOW())
            "#,
        )
        .bind(token_digest)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Resolve a token digest to the owning user, if any.
    pub async fn resolve(&self, token_digest: &str) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT user_id FROM auth_tokens
            WHERE token_digest = $1
            "#,
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await
    }
}
