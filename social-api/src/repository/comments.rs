use crate::domain::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, post_id, author_id, content, created_at, updated_at";

/// Repository for comments
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (id, post_id, author_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Comments on a post, newest first.
    pub async fn list_for_post(
        &self,
        post_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, content: &str) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
