//! Persistence seams.
//!
//! Every aggregate has its own repository trait. Writes are full-row:
//! services load an entity, mutate it and write it back, so concurrent
//! updates of the same entity resolve as last-writer-wins.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::{
    error::AppResult,
    models::{NewNotification, Notification, NotificationView, Project, Sample, User},
};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: User) -> AppResult<User>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn update_user(&self, user: &User) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Fails with `Conflict` when the project name is taken
    async fn insert_project(&self, project: Project) -> AppResult<Project>;

    async fn find_project(&self, id: Uuid) -> AppResult<Option<Project>>;

    async fn find_project_by_name(&self, name: &str) -> AppResult<Option<Project>>;

    async fn list_projects_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Project>>;

    /// Projects the user created, leads or is a member of, newest first
    async fn list_projects_involving(&self, user_id: Uuid) -> AppResult<Vec<Project>>;

    async fn update_project(&self, project: &Project) -> AppResult<Option<Project>>;

    /// Removes the project together with its samples
    async fn delete_project(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait SampleRepository: Send + Sync {
    /// Fails with `Conflict` when the identification is taken
    async fn insert_sample(&self, sample: Sample) -> AppResult<Sample>;

    async fn find_sample(&self, id: Uuid) -> AppResult<Option<Sample>>;

    async fn find_sample_by_identification(
        &self,
        identification: &str,
    ) -> AppResult<Option<Sample>>;

    async fn list_samples_by_project(&self, project_id: Uuid) -> AppResult<Vec<Sample>>;

    async fn update_sample(&self, sample: &Sample) -> AppResult<Option<Sample>>;

    async fn delete_sample(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert_notification(&self, notification: NewNotification)
    -> AppResult<Notification>;

    /// Newest first, at most `limit` entries
    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<NotificationView>>;

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64>;

    /// `None` when the notification is missing or addressed to someone else
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>>;

    /// Number of notifications flipped from unread to read
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Complete persistence backend
#[async_trait]
pub trait Store:
    UserRepository + ProjectRepository + SampleRepository + NotificationRepository
{
    fn backend_name(&self) -> &'static str;

    async fn health_check(&self) -> AppResult<bool>;
}
