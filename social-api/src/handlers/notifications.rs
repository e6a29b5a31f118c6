/// Notification endpoints: listing, unread count, mark-read, delete.
/// Every route is scoped to the authenticated recipient; another user's
/// notification id answers 404.
use crate::config::Config;
use crate::error::Result;
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::services::NotificationService;
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

/// GET /api/notifications
pub async fn list_notifications(
    notifications: web::Data<NotificationService>,
    config: web::Data<Config>,
    user: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.limit_offset(&config.pagination);
    let results = notifications.list_for(user.0, limit, offset).await?;

    Ok(HttpResponse::Ok().json(results))
}

/// GET /api/notifications/unread_count
pub async fn unread_count(
    notifications: web::Data<NotificationService>,
    user: UserId,
) -> Result<HttpResponse> {
    let count = notifications.unread_count(user.0).await?;

    Ok(HttpResponse::Ok().json(json!({ "unread_count": count })))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    notifications: web::Data<NotificationService>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    notifications.mark_read(user.0, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "detail": "Notification marked as read." })))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    notifications: web::Data<NotificationService>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    notifications.delete(user.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/notifications", web::get().to(list_notifications))
        .route("/notifications/unread_count", web::get().to(unread_count))
        .route("/notifications/{id}/read", web::post().to(mark_read))
        .route("/notifications/{id}", web::delete().to(delete_notification));
}
