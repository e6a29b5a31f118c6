//! Shared helpers for the database-gated suites.
//!
//! Tests run against the database named by TEST_DATABASE_URL and skip
//! cleanly when it is unset, so the workspace stays green without local
//! infrastructure.
#![allow(dead_code)]

use social_api::domain::models::{Post, User};
use social_api::repository::{PostRepository, UserRepository};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping database-backed test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to TEST_DATABASE_URL");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    Some(pool)
}

/// Create a user with a unique username. The password hash is a dummy
/// value; tests that need real credentials go through AccountService.
pub async fn create_user(pool: &PgPool, prefix: &str) -> User {
    let username = format!("{}-{}", prefix, Uuid::new_v4().simple());
    let email = format!("{}@example.com", username);
    UserRepository::new(pool.clone())
        .create(&username, &email, "not-a-real-hash", None, None)
        .await
        .expect("failed to create user")
}

pub async fn create_post(pool: &PgPool, author: &User, title: &str) -> Post {
    PostRepository::new(pool.clone())
        .create(author.id, title, "body")
        .await
        .expect("failed to create post")
}
