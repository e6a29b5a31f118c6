use crate::domain::models::User;
use crate::repository::users::UserRow;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the directed follow relation. The unique constraint on
/// (follower_id, followee_id) keeps the relation a set; self-follows are
/// rejected before this layer and by a CHECK constraint.
#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent edge create; returns true if a new edge was inserted.
    pub async fn insert(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, sqlx::Error> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (id, follower_id, followee_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    /// Idempotent edge delete; returns true if an edge was removed.
    pub async fn delete(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, sqlx::Error> {
        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND followee_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    pub async fn exists(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follows
                WHERE follower_id = $1 AND followee_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Users following the given user, most recent edge first.
    pub async fn followers(
        &self,
        followee_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.email, u.bio, u.avatar_url, u.created_at
            FROM users u
            JOIN follows f ON f.follower_id = u.id
            WHERE f.followee_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(followee_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Users the given user follows, most recent edge first.
    pub async fn following(
        &self,
        follower_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.email, u.bio, u.avatar_url, u.created_at
            FROM users u
            JOIN follows f ON f.followee_id = u.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(follower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
