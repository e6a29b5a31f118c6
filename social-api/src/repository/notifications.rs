use crate::domain::models::{Notification, TargetKind, TargetRef};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Flat row shape for the notifications table; the target kind tag and
/// id collapse into a typed `TargetRef` on the way out.
#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: Uuid,
    actor_id: Uuid,
    verb: String,
    target_kind: Option<String>,
    target_id: Option<Uuid>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        let target = match (row.target_kind.as_deref(), row.target_id) {
            (Some(kind), Some(id)) => TargetKind::parse(kind).map(|kind| TargetRef { kind, id }),
            _ => None,
        };
        Notification {
            id: row.id,
            recipient_id: row.recipient_id,
            actor_id: row.actor_id,
            verb: row.verb,
            target,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, actor_id, verb, target_kind, target_id, read, created_at";

/// Repository for the notification log
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        verb: &str,
        target: Option<TargetRef>,
    ) -> Result<Notification, sqlx::Error> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            INSERT INTO notifications (id, recipient_id, actor_id, verb, target_kind, target_id, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW())
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(recipient_id)
        .bind(actor_id)
        .bind(verb)
        .bind(target.map(|t| t.kind.as_str()))
        .bind(target.map(|t| t.id))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// A recipient's notifications: unread first, then newest first
    /// within each read-state partition, id descending on timestamp ties.
    pub async fn list_for(
        &self,
        recipient_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY read ASC, created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(recipient_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Mark one of the recipient's notifications as read; returns false
    /// when the id does not belong to the recipient.
    pub async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1 AND recipient_id = $2
            "#,
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one of the recipient's notifications.
    pub async fn delete(&self, recipient_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE id = $1 AND recipient_id = $2
            "#,
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE recipient_id = $1 AND read = FALSE
            "#,
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
    }
}
