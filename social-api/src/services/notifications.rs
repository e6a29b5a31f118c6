/// Notification store: a durable log of directed notices.
///
/// Appends happen as a side effect of state-changing interactions. When
/// the primary state change has already committed, a failed append is
/// logged and dropped rather than rolled back or retried; a missing
/// notification is not safety-critical.
use crate::domain::models::{Notification, TargetRef};
use crate::error::{AppError, Result};
use crate::repository::NotificationRepository;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: NotificationRepository::new(pool),
        }
    }

    /// Append a notice to the recipient's log.
    pub async fn append(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        verb: &str,
        target: Option<TargetRef>,
    ) -> Result<Notification> {
        Ok(self.repo.insert(recipient_id, actor_id, verb, target).await?)
    }

    /// Fire-and-forget append for callers whose primary action already
    /// happened.
    pub async fn append_or_log(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        verb: &str,
        target: Option<TargetRef>,
    ) {
        if let Err(e) = self.append(recipient_id, actor_id, verb, target).await {
            warn!(%recipient_id, %actor_id, verb, "dropping failed notification append: {}", e);
        }
    }

    /// The recipient's notifications, unread first, then newest first.
    pub async fn list_for(
        &self,
        recipient_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        Ok(self.repo.list_for(recipient_id, limit, offset).await?)
    }

    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<i64> {
        Ok(self.repo.unread_count(recipient_id).await?)
    }

    /// Mark one of the recipient's notifications as read. Another user's
    /// notification is indistinguishable from a missing one.
    pub async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<()> {
        if self.repo.mark_read(recipient_id, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("notification {}", id)))
        }
    }

    /// Delete one of the recipient's notifications. Deletion only ever
    /// happens through this explicit recipient action.
    pub async fn delete(&self, recipient_id: Uuid, id: Uuid) -> Result<()> {
        if self.repo.delete(recipient_id, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("notification {}", id)))
        }
    }
}
