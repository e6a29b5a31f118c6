/// Post CRUD, the like toggle, and the follow feed.
use crate::config::Config;
use crate::domain::models::LikeToggle;
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::repository::{LikeRepository, PostRepository};
use crate::services::InteractionService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// POST /api/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }

    let post = PostRepository::new(pool.get_ref().clone())
        .create(user.0, title, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts
pub async fn list_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    search: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.limit_offset(&config.pagination);
    let repo = PostRepository::new(pool.get_ref().clone());
    let search = search.search.as_deref();

    let count = repo.count(search).await?;
    let results = repo.list(search, limit, offset).await?;

    Ok(HttpResponse::Ok().json(json!({
        "count": count,
        "results": results,
    })))
}

/// GET /api/posts/{id}
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let post = PostRepository::new(pool.get_ref().clone())
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
    let like_count = LikeRepository::new(pool.get_ref().clone())
        .count_for_post(post_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "post": post,
        "like_count": like_count,
    })))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let repo = PostRepository::new(pool.get_ref().clone());
    let post = repo
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
    if post.author_id != user.0 {
        return Err(AppError::Forbidden("you are not the author of this post".into()));
    }

    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }

    let updated = repo
        .update(post_id, title, &req.content)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let repo = PostRepository::new(pool.get_ref().clone());
    let post = repo
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
    if post.author_id != user.0 {
        return Err(AppError::Forbidden("you are not the author of this post".into()));
    }

    repo.delete(post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/like
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    interactions: web::Data<InteractionService>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let outcome = interactions.toggle_like(user.0, post_id).await?;
    let like_count = LikeRepository::new(pool.get_ref().clone())
        .count_for_post(post_id)
        .await?;

    let detail = match outcome {
        LikeToggle::Liked => "You liked this post.",
        LikeToggle::Unliked => "You removed your like.",
    };

    Ok(HttpResponse::Ok().json(json!({
        "status": outcome,
        "detail": detail,
        "like_count": like_count,
    })))
}

/// POST /api/posts/{id}/unlike
pub async fn unlike(
    interactions: web::Data<InteractionService>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let removed = interactions.unlike(user.0, path.into_inner()).await?;
    let detail = if removed {
        "You removed your like."
    } else {
        "You had not liked this post."
    };

    Ok(HttpResponse::Ok().json(json!({
        "removed": removed,
        "detail": detail,
    })))
}

/// GET /api/feed
pub async fn feed(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.limit_offset(&config.pagination);
    let posts = PostRepository::new(pool.get_ref().clone())
        .feed_for(user.0, limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(list_posts))
            .route(web::post().to(create_post)),
    )
    .service(
        web::resource("/posts/{id}")
            .route(web::get().to(get_post))
            .route(web::put().to(update_post))
            .route(web::delete().to(delete_post)),
    )
    .route("/posts/{id}/like", web::post().to(toggle_like))
    .route("/posts/{id}/unlike", web::post().to(unlike))
    .route("/feed", web::get().to(feed));
}
