use super::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Warning,
    Success,
    Error,
    /// Activity performed by another user
    Action,
}

/// In-app message addressed to one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub related_project: Option<Uuid>,
    pub related_sample: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Notification {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Fields of a notification about to be created
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub related_project: Option<Uuid>,
    pub related_sample: Option<Uuid>,
}

impl NewNotification {
    pub fn into_notification(self) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient: self.recipient,
            title: self.title,
            message: self.message,
            notification_type: self.notification_type,
            is_read: false,
            related_project: self.related_project,
            related_sample: self.related_sample,
            created_at: Utc::now(),
        }
    }
}

/// Notification listing entry with the related entity names resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub project_name: Option<String>,
    pub sample_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResult {
    pub modified: u64,
}
