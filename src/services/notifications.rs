use crate::{
    error::{AppError, AppResult},
    models::{NewNotification, Notification, NotificationView},
    repositories::NotificationRepository,
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Persist a single notification.
///
/// Storage failures are logged and reported as `None`; a missing
/// notification never fails the operation that produced it.
pub async fn create_notification(
    repo: &dyn NotificationRepository,
    notification: NewNotification,
) -> Option<Notification> {
    let recipient = notification.recipient;
    match repo.insert_notification(notification).await {
        Ok(created) => {
            debug!("Notification {} created for user {}", created.id, recipient);
            Some(created)
        }
        Err(e) => {
            warn!("Failed to create notification for user {}: {}", recipient, e);
            None
        }
    }
}

/// Per-user notification queries and read-state updates
#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
    list_limit: i64,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>, list_limit: i64) -> Self {
        Self { repo, list_limit }
    }

    pub async fn create(&self, notification: NewNotification) -> Option<Notification> {
        create_notification(self.repo.as_ref(), notification).await
    }

    /// The most recent notifications of a user, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<NotificationView>> {
        self.repo.list_notifications(user_id, self.list_limit).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        self.repo.count_unread(user_id).await
    }

    /// Mark one notification read. Only its recipient may do so.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<Notification> {
        self.repo
            .mark_read(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification"))
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let modified = self.repo.mark_all_read(user_id).await?;
        debug!("Marked {} notifications read for user {}", modified, user_id);
        Ok(modified)
    }
}
