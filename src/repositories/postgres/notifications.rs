use super::PgStore;
use crate::{
    error::AppResult,
    models::{NewNotification, Notification, NotificationView},
    repositories::NotificationRepository,
};
use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct NotificationViewRow {
    #[sqlx(flatten)]
    notification: Notification,
    project_name: Option<String>,
    sample_name: Option<String>,
}

#[async_trait]
impl NotificationRepository for PgStore {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> AppResult<Notification> {
        let notification = notification.into_notification();
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (
                id, recipient, title, message, notification_type, is_read,
                related_project, related_sample, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, recipient, title, message, notification_type, is_read,
                related_project, related_sample, created_at
            "#,
        )
        .bind(notification.id)
        .bind(notification.recipient)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.notification_type)
        .bind(notification.is_read)
        .bind(notification.related_project)
        .bind(notification.related_sample)
        .bind(notification.created_at)
        .fetch_one(self.db.pool())
        .await?;

        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<NotificationView>> {
        let rows = sqlx::query_as::<_, NotificationViewRow>(
            r#"
            SELECT
                n.id, n.recipient, n.title, n.message, n.notification_type, n.is_read,
                n.related_project, n.related_sample, n.created_at,
                p.project_name AS project_name,
                s.name AS sample_name
            FROM notifications n
            LEFT JOIN projects p ON p.id = n.related_project
            LEFT JOIN samples s ON s.id = n.related_sample
            WHERE n.recipient = $1
            ORDER BY n.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| NotificationView {
                notification: row.notification,
                project_name: row.project_name,
                sample_name: row.sample_name,
            })
            .collect())
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND recipient = $2
            RETURNING
                id, recipient, title, message, notification_type, is_read,
                related_project, related_sample, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(notification)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected())
    }
}
