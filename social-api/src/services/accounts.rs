/// Account registration, login, and profile management.
use crate::domain::models::User;
use crate::error::{AppError, Result};
use crate::repository::{TokenRepository, UserRepository};
use crate::security::password::{hash_password, verify_password};
use crate::security::token::{generate_token, token_digest};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    tokens: TokenRepository,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            tokens: TokenRepository::new(pool),
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        bio: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<AuthSession> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("username must not be empty".into()));
        }

        let password_hash = hash_password(password)?;

        let user = match self
            .users
            .create(username, email, &password_hash, bio, avatar_url)
            .await
        {
            Ok(user) => user,
            Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => {
                return Err(AppError::Conflict("username is already taken".into()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, username, "user registered");
        self.issue_session(user).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession> {
        let Some((user, password_hash)) = self.users.find_with_password(username).await? else {
            return Err(AppError::Unauthorized("invalid username or password".into()));
        };

        if !verify_password(password, &password_hash)? {
            return Err(AppError::Unauthorized("invalid username or password".into()));
        }

        self.issue_session(user).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        bio: &str,
        avatar_url: Option<&str>,
    ) -> Result<User> {
        self.users
            .update_profile(id, bio, avatar_url)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn issue_session(&self, user: User) -> Result<AuthSession> {
        let token = generate_token();
        self.tokens.insert(&token_digest(&token), user.id).await?;
        Ok(AuthSession { user, token })
    }
}
