/// Account and social-graph handlers: registration, login, profile,
/// follow/unfollow, follower listings.
use crate::config::Config;
use crate::domain::models::{FollowOutcome, UnfollowOutcome};
use crate::error::Result;
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::repository::FollowRepository;
use crate::services::{AccountService, InteractionService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// POST /api/auth/register
pub async fn register(
    accounts: web::Data<AccountService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let session = accounts
        .register(
            &req.username,
            req.email.as_deref().unwrap_or(""),
            &req.password,
            req.bio.as_deref(),
            req.avatar_url.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "user": session.user,
        "token": session.token,
    })))
}

/// POST /api/auth/login
pub async fn login(
    accounts: web::Data<AccountService>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let session = accounts.login(&req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(json!({
        "user": session.user,
        "token": session.token,
    })))
}

/// GET /api/profile
pub async fn get_profile(
    accounts: web::Data<AccountService>,
    user: UserId,
) -> Result<HttpResponse> {
    let profile = accounts.get_user(user.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/profile
pub async fn update_profile(
    accounts: web::Data<AccountService>,
    user: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let updated = accounts
        .update_profile(user.0, &req.bio, req.avatar_url.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/users/{id}/follow
pub async fn follow_user(
    interactions: web::Data<InteractionService>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let outcome = interactions.follow(user.0, path.into_inner()).await?;
    let detail = match outcome {
        FollowOutcome::Followed => "You are now following this user.",
        FollowOutcome::AlreadyFollowing => "You are already following this user.",
    };

    Ok(HttpResponse::Ok().json(json!({
        "status": outcome,
        "detail": detail,
    })))
}

/// POST /api/users/{id}/unfollow
pub async fn unfollow_user(
    interactions: web::Data<InteractionService>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let outcome = interactions.unfollow(user.0, path.into_inner()).await?;
    let detail = match outcome {
        UnfollowOutcome::Unfollowed => "You have unfollowed this user.",
        UnfollowOutcome::NotFollowing => "You were not following this user.",
    };

    Ok(HttpResponse::Ok().json(json!({
        "status": outcome,
        "detail": detail,
    })))
}

/// GET /api/users/{id}/followers
pub async fn list_followers(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.limit_offset(&config.pagination);
    let followers = FollowRepository::new(pool.get_ref().clone())
        .followers(path.into_inner(), limit, offset)
        .await
        .map_err(crate::error::AppError::from)?;

    Ok(HttpResponse::Ok().json(followers))
}

/// GET /api/users/{id}/following
pub async fn list_following(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.limit_offset(&config.pagination);
    let following = FollowRepository::new(pool.get_ref().clone())
        .following(path.into_inner(), limit, offset)
        .await
        .map_err(crate::error::AppError::from)?;

    Ok(HttpResponse::Ok().json(following))
}

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login)),
    )
    .service(
        web::resource("/profile")
            .route(web::get().to(get_profile))
            .route(web::put().to(update_profile)),
    )
    .service(
        web::scope("/users")
            .route("/{id}/follow", web::post().to(follow_user))
            .route("/{id}/unfollow", web::post().to(unfollow_user))
            .route("/{id}/followers", web::get().to(list_followers))
            .route("/{id}/following", web::get().to(list_following)),
    );
}
