/// Comment CRUD. Writes require the author; reads are public.
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::repository::{CommentRepository, PostRepository};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// GET /api/posts/{id}/comments
pub async fn list_post_comments(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    if !PostRepository::new(pool.get_ref().clone()).exists(post_id).await? {
        return Err(AppError::NotFound(format!("post {}", post_id)));
    }

    let (limit, offset) = query.limit_offset(&config.pagination);
    let comments = CommentRepository::new(pool.get_ref().clone())
        .list_for_post(post_id, limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/comments
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("content must not be empty".into()));
    }
    if !PostRepository::new(pool.get_ref().clone()).exists(req.post_id).await? {
        return Err(AppError::NotFound(format!("post {}", req.post_id)));
    }

    let comment = CommentRepository::new(pool.get_ref().clone())
        .create(req.post_id, user.0, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// GET /api/comments/{id}
pub async fn get_comment(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let comment_id = path.into_inner();
    let comment = CommentRepository::new(pool.get_ref().clone())
        .get(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;

    Ok(HttpResponse::Ok().json(comment))
}

/// PUT /api/comments/{id}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();
    let repo = CommentRepository::new(pool.get_ref().clone());
    let comment = repo
        .get(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;
    if comment.author_id != user.0 {
        return Err(AppError::Forbidden(
            "you are not the author of this comment".into(),
        ));
    }
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("content must not be empty".into()));
    }

    let updated = repo
        .update(comment_id, &req.content)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();
    let repo = CommentRepository::new(pool.get_ref().clone());
    let comment = repo
        .get(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;
    if comment.author_id != user.0 {
        return Err(AppError::Forbidden(
            "you are not the author of this comment".into(),
        ));
    }

    repo.delete(comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/posts/{id}/comments", web::get().to(list_post_comments))
        .service(web::resource("/comments").route(web::post().to(create_comment)))
        .service(
            web::resource("/comments/{id}")
                .route(web::get().to(get_comment))
                .route(web::put().to(update_comment))
                .route(web::delete().to(delete_comment)),
        );
}
