//! In-process backend with the same semantics as the PostgreSQL store.

use super::{NotificationRepository, ProjectRepository, SampleRepository, Store, UserRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Entity, NewNotification, Notification, NotificationView, Project, Sample, User},
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    samples: HashMap<Uuid, Sample>,
    /// Insertion order
    notifications: Vec<Notification>,
}

/// Store backed by in-memory maps
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Replace an existing entity, returning the stored copy
fn replace<T>(map: &mut HashMap<Uuid, T>, entity: &T) -> Option<T>
where
    T: Entity<Id = Uuid> + Clone,
{
    let slot = map.get_mut(&entity.id())?;
    *slot = entity.clone();
    Some(slot.clone())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: User) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User already exists"));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: &User) -> AppResult<Option<User>> {
        let mut state = self.state.write().await;
        Ok(replace(&mut state.users, user))
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn insert_project(&self, project: Project) -> AppResult<Project> {
        let mut state = self.state.write().await;
        if state
            .projects
            .values()
            .any(|p| p.project_name == project.project_name)
        {
            return Err(AppError::conflict("Project already exists"));
        }
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> AppResult<Option<Project>> {
        Ok(self.state.read().await.projects.get(&id).cloned())
    }

    async fn find_project_by_name(&self, name: &str) -> AppResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .values()
            .find(|p| p.project_name == name)
            .cloned())
    }

    async fn list_projects_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| p.created_by == user_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn list_projects_involving(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| p.involves(user_id))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> AppResult<Option<Project>> {
        let mut state = self.state.write().await;
        if state
            .projects
            .values()
            .any(|p| p.id != project.id && p.project_name == project.project_name)
        {
            return Err(AppError::conflict("Project already exists"));
        }
        Ok(replace(&mut state.projects, project))
    }

    async fn delete_project(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let removed = state.projects.remove(&id).is_some();
        if removed {
            state.samples.retain(|_, s| s.project_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl SampleRepository for MemoryStore {
    async fn insert_sample(&self, sample: Sample) -> AppResult<Sample> {
        let mut state = self.state.write().await;
        if state
            .samples
            .values()
            .any(|s| s.identification == sample.identification)
        {
            return Err(AppError::conflict("Sample identification already exists"));
        }
        state.samples.insert(sample.id, sample.clone());
        Ok(sample)
    }

    async fn find_sample(&self, id: Uuid) -> AppResult<Option<Sample>> {
        Ok(self.state.read().await.samples.get(&id).cloned())
    }

    async fn find_sample_by_identification(
        &self,
        identification: &str,
    ) -> AppResult<Option<Sample>> {
        let state = self.state.read().await;
        Ok(state
            .samples
            .values()
            .find(|s| s.identification == identification)
            .cloned())
    }

    async fn list_samples_by_project(&self, project_id: Uuid) -> AppResult<Vec<Sample>> {
        let state = self.state.read().await;
        let mut samples: Vec<Sample> = state
            .samples
            .values()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        samples.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(samples)
    }

    async fn update_sample(&self, sample: &Sample) -> AppResult<Option<Sample>> {
        let mut state = self.state.write().await;
        Ok(replace(&mut state.samples, sample))
    }

    async fn delete_sample(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.samples.remove(&id).is_some())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> AppResult<Notification> {
        let notification = notification.into_notification();
        self.state
            .write()
            .await
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<NotificationView>> {
        let state = self.state.read().await;
        // Reverse insertion order first so equal timestamps list newest first
        let mut own: Vec<&Notification> = state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient == user_id)
            .collect();
        own.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(own
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|n| NotificationView {
                notification: n.clone(),
                project_name: n
                    .related_project
                    .and_then(|id| state.projects.get(&id))
                    .map(|p| p.project_name.clone()),
                sample_name: n
                    .related_sample
                    .and_then(|id| state.samples.get(&id))
                    .map(|s| s.name.clone()),
            })
            .collect())
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.recipient == user_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        let mut state = self.state.write().await;
        Ok(state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient == user_id)
            .map(|n| {
                n.is_read = true;
                n.clone()
            }))
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut modified = 0;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.recipient == user_id && !n.is_read)
        {
            n.is_read = true;
            modified += 1;
        }
        Ok(modified)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
