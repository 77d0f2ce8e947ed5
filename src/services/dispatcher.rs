//! Best-effort notification fan-out.
//!
//! One task per recipient is spawned and the batch is joined; recipients
//! whose notification could not be stored are dropped from the result.

use super::notifications::create_notification;
use crate::{
    models::{NewNotification, Notification, NotificationType},
    repositories::NotificationRepository,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// One or many recipient ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients(Vec<Uuid>);

impl Recipients {
    /// Deduplicated candidates, without the acting user
    pub fn excluding<I>(candidates: I, actor: Uuid) -> Self
    where
        I: IntoIterator<Item = Uuid>,
    {
        let mut ids = Vec::new();
        for id in candidates {
            if id != actor && !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }
}

impl From<Uuid> for Recipients {
    fn from(id: Uuid) -> Self {
        Self(vec![id])
    }
}

impl From<Vec<Uuid>> for Recipients {
    fn from(ids: Vec<Uuid>) -> Self {
        Self(ids)
    }
}

impl From<&[Uuid]> for Recipients {
    fn from(ids: &[Uuid]) -> Self {
        Self(ids.to_vec())
    }
}

impl IntoIterator for Recipients {
    type Item = Uuid;
    type IntoIter = std::vec::IntoIter<Uuid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Message parameters shared by every recipient of a dispatch
#[derive(Debug, Clone)]
pub struct Message {
    pub title: String,
    pub body: String,
    pub notification_type: NotificationType,
    pub related_project: Option<Uuid>,
    pub related_sample: Option<Uuid>,
}

impl Message {
    /// Activity message with the default title and type
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            title: "New Activity".to_string(),
            body: body.into(),
            notification_type: NotificationType::Action,
            related_project: None,
            related_sample: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn kind(mut self, notification_type: NotificationType) -> Self {
        self.notification_type = notification_type;
        self
    }

    pub fn project(mut self, project_id: Uuid) -> Self {
        self.related_project = Some(project_id);
        self
    }

    pub fn sample(mut self, sample_id: Uuid) -> Self {
        self.related_sample = Some(sample_id);
        self
    }

    fn addressed_to(&self, recipient: Uuid) -> NewNotification {
        NewNotification {
            recipient,
            title: self.title.clone(),
            message: self.body.clone(),
            notification_type: self.notification_type,
            related_project: self.related_project,
            related_sample: self.related_sample,
        }
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationDispatcher {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Personal notification for a single user
    pub async fn notify_user(&self, recipient: Uuid, message: &Message) -> Option<Notification> {
        create_notification(self.repo.as_ref(), message.addressed_to(recipient)).await
    }

    /// Create one notification per recipient concurrently and return the
    /// ones that were stored. Never fails.
    pub async fn notify_users(
        &self,
        recipients: impl Into<Recipients>,
        message: &Message,
    ) -> Vec<Notification> {
        let recipients = recipients.into();
        if recipients.is_empty() {
            return Vec::new();
        }
        let requested = recipients.len();

        let handles: Vec<_> = recipients
            .into_iter()
            .map(|recipient| {
                let repo = self.repo.clone();
                let notification = message.addressed_to(recipient);
                tokio::spawn(async move { create_notification(repo.as_ref(), notification).await })
            })
            .collect();

        let delivered: Vec<Notification> = join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(created) => created,
                Err(e) => {
                    warn!("Notification task did not complete: {}", e);
                    None
                }
            })
            .collect();

        debug!(
            "Dispatched \"{}\" to {}/{} recipients",
            message.title,
            delivered.len(),
            requested
        );
        delivered
    }
}
