use super::{NotificationDispatcher, ProjectService, SampleService};
use crate::{
    error::{AppError, AppResult},
    models::{
        CreateSampleRequest, NewNotification, Notification, NotificationView, Project,
        ProjectRequest, Sample, User, UserRole,
    },
    repositories::{
        MemoryStore, NotificationRepository, ProjectRepository, SampleRepository, Store,
        UserRepository,
    },
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Services wired to a fresh in-memory store
pub struct Lab {
    pub store: Arc<MemoryStore>,
    pub projects: ProjectService,
    pub samples: SampleService,
}

impl Lab {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let (projects, samples) = Self::services_over(store.clone());
        Self {
            store,
            projects,
            samples,
        }
    }

    /// Services over `store`, notifying through the same store
    pub fn services_over<S: Store + 'static>(store: Arc<S>) -> (ProjectService, SampleService) {
        let notifier = NotificationDispatcher::new(store.clone());
        (
            ProjectService::new(store.clone(), notifier.clone()),
            SampleService::new(store, notifier),
        )
    }

    pub async fn user(&self, name: &str, role: UserRole) -> User {
        let user = User::new(
            name.to_string(),
            format!("{}@lab.test", name.to_lowercase()),
            role,
            true,
        );
        self.store.insert_user(user).await.unwrap()
    }

    pub async fn project(&self, name: &str, creator: Uuid, lead: Uuid, members: Vec<Uuid>) -> Project {
        self.projects
            .create_project(project_request(name, lead, members), creator)
            .await
            .unwrap()
    }

    pub async fn sample(&self, project: &Project, identification: &str, actor: Uuid) -> Sample {
        self.projects
            .add_sample(project.id, sample_request(identification), actor, None)
            .await
            .unwrap()
    }

    pub async fn unread(&self, user: Uuid) -> i64 {
        self.store.count_unread(user).await.unwrap()
    }

    pub async fn titles(&self, user: Uuid) -> Vec<String> {
        self.store
            .list_notifications(user, 50)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.notification.title)
            .collect()
    }
}

pub fn project_request(name: &str, lead: Uuid, members: Vec<Uuid>) -> ProjectRequest {
    ProjectRequest {
        project_name: Some(name.to_string()),
        research_domain: Some("Plant pathology".to_string()),
        team_lead: Some(lead),
        team_members: members,
        start_date: Some(Utc::now()),
        deadline: Some(Utc::now() + Duration::days(90)),
        description: Some("Field study".to_string()),
        budget: Some(5000.0),
        status: None,
    }
}

pub fn sample_request(identification: &str) -> CreateSampleRequest {
    CreateSampleRequest {
        name: Some(format!("Sample {}", identification)),
        identification: Some(identification.to_string()),
        sample_type: Some("Leaf".to_string()),
        ..Default::default()
    }
}

/// Memory store whose project or user updates fail
pub struct FailingWrites {
    inner: Arc<MemoryStore>,
    projects: bool,
    users: bool,
}

impl FailingWrites {
    pub fn project_updates(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            projects: true,
            users: false,
        }
    }

    pub fn user_updates(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            projects: false,
            users: true,
        }
    }
}

fn write_failure() -> AppError {
    AppError::internal("write rejected")
}

#[async_trait]
impl UserRepository for FailingWrites {
    async fn insert_user(&self, user: User) -> AppResult<User> {
        self.inner.insert_user(user).await
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.inner.find_user(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.inner.find_user_by_email(email).await
    }

    async fn update_user(&self, user: &User) -> AppResult<Option<User>> {
        if self.users {
            return Err(write_failure());
        }
        self.inner.update_user(user).await
    }
}

#[async_trait]
impl ProjectRepository for FailingWrites {
    async fn insert_project(&self, project: Project) -> AppResult<Project> {
        self.inner.insert_project(project).await
    }

    async fn find_project(&self, id: Uuid) -> AppResult<Option<Project>> {
        self.inner.find_project(id).await
    }

    async fn find_project_by_name(&self, name: &str) -> AppResult<Option<Project>> {
        self.inner.find_project_by_name(name).await
    }

    async fn list_projects_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        self.inner.list_projects_by_creator(user_id).await
    }

    async fn list_projects_involving(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        self.inner.list_projects_involving(user_id).await
    }

    async fn update_project(&self, project: &Project) -> AppResult<Option<Project>> {
        if self.projects {
            return Err(write_failure());
        }
        self.inner.update_project(project).await
    }

    async fn delete_project(&self, id: Uuid) -> AppResult<bool> {
        self.inner.delete_project(id).await
    }
}

#[async_trait]
impl SampleRepository for FailingWrites {
    async fn insert_sample(&self, sample: Sample) -> AppResult<Sample> {
        self.inner.insert_sample(sample).await
    }

    async fn find_sample(&self, id: Uuid) -> AppResult<Option<Sample>> {
        self.inner.find_sample(id).await
    }

    async fn find_sample_by_identification(
        &self,
        identification: &str,
    ) -> AppResult<Option<Sample>> {
        self.inner.find_sample_by_identification(identification).await
    }

    async fn list_samples_by_project(&self, project_id: Uuid) -> AppResult<Vec<Sample>> {
        self.inner.list_samples_by_project(project_id).await
    }

    async fn update_sample(&self, sample: &Sample) -> AppResult<Option<Sample>> {
        self.inner.update_sample(sample).await
    }

    async fn delete_sample(&self, id: Uuid) -> AppResult<bool> {
        self.inner.delete_sample(id).await
    }
}

#[async_trait]
impl NotificationRepository for FailingWrites {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> AppResult<Notification> {
        self.inner.insert_notification(notification).await
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<NotificationView>> {
        self.inner.list_notifications(user_id, limit).await
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        self.inner.count_unread(user_id).await
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        self.inner.mark_read(id, user_id).await
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        self.inner.mark_all_read(user_id).await
    }
}

#[async_trait]
impl Store for FailingWrites {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
