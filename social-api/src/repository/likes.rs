use crate::domain::models::Like;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the like ledger. The unique constraint on
/// (user_id, post_id) is the backstop against concurrent duplicate
/// creates; a lost race shows up as `insert` returning None.
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a like; returns None if the (user, post) pair already holds one.
    pub async fn insert(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, sqlx::Error> {
        sqlx::query_as::<_, Like>(
            r#"
            INSERT INTO likes (id, user_id, post_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, post_id) DO NOTHING
            RETURNING id, user_id, post_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a like; returns true if a row was removed.
    pub async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check if the user has liked the post.
    pub async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Get like count for a post.
    pub async fn count_for_post(&self, post_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM likes
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
    }
}
