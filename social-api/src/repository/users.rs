use crate::domain::models::{Profile, User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Flat row shape for the users table. Converted into the domain `User`
/// so the optional profile becomes a typed field.
#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        // A profile exists exactly when a bio was stored.
        let profile = row.bio.map(|bio| Profile {
            bio,
            avatar_url: row.avatar_url,
        });
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            profile,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, bio, avatar_url, created_at";

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. A duplicate username surfaces as a unique
    /// violation for the caller to map.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        bio: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, bio, avatar_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(bio)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Fetch a user together with the stored password hash, for login.
    pub async fn find_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, sqlx::Error> {
        #[derive(sqlx::FromRow)]
        struct CredentialRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| (r.user.into(), r.password_hash)))
    }

    /// Replace the user's profile fields.
    pub async fn update_profile(
        &self,
        id: Uuid,
        bio: &str,
        avatar_url: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET bio = $2, avatar_url = $3
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(bio)
        .bind(avatar_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
