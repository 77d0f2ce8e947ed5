use super::{
    dispatcher::{Message, NotificationDispatcher, Recipients},
    progress::progress_of,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        CreateSampleRequest, FileDescriptor, NotificationType, Project, ProjectDetail,
        ProjectOverview, ProjectRequest, Sample, User,
    },
    repositories::{ProjectRepository, SampleRepository, Store, UserRepository},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Project lifecycle: creation, updates, samples, team and final report
#[derive(Clone)]
pub struct ProjectService {
    pub(super) store: Arc<dyn Store>,
    pub(super) notifier: NotificationDispatcher,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>, notifier: NotificationDispatcher) -> Self {
        Self { store, notifier }
    }

    pub(super) async fn load(&self, project_id: Uuid) -> AppResult<Project> {
        self.store
            .find_project(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))
    }

    pub(super) async fn save(&self, project: &Project) -> AppResult<Project> {
        self.store
            .update_project(project)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))
    }

    pub async fn create_project(&self, request: ProjectRequest, creator: Uuid) -> AppResult<Project> {
        let fields = request.into_fields()?;
        if self
            .store
            .find_project_by_name(&fields.project_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Project already exists"));
        }

        let project = self.store.insert_project(Project::new(fields, creator)).await?;
        info!("Project {} \"{}\" created by {}", project.id, project.project_name, creator);

        // Failing to record the project on its creator does not fail the creation
        if let Err(e) = self
            .update_user_projects(creator, |projects| projects.push(project.id))
            .await
        {
            warn!(
                "Project {} not recorded on user {}: {}",
                project.id, creator, e
            );
        }

        let personal = Message::new(format!(
            "Your project \"{}\" has been created successfully",
            project.project_name
        ))
        .title("Project Created")
        .kind(NotificationType::Success)
        .project(project.id);
        self.notifier.notify_user(creator, &personal).await;

        let broadcast = Message::new(format!(
            "You have been added to the project \"{}\"",
            project.project_name
        ))
        .title("Added to Project")
        .project(project.id);
        self.notifier
            .notify_users(Recipients::excluding(project.team(), creator), &broadcast)
            .await;

        Ok(project)
    }

    /// Replace every mutable field of the project
    pub async fn update_project(&self, project_id: Uuid, request: ProjectRequest) -> AppResult<Project> {
        let fields = request.into_fields()?;
        let mut project = self.load(project_id).await?;

        if fields.project_name != project.project_name
            && self
                .store
                .find_project_by_name(&fields.project_name)
                .await?
                .is_some()
        {
            return Err(AppError::conflict("Project already exists"));
        }

        project.replace_fields(fields);
        self.save(&project).await
    }

    /// Only the creator may delete a project; its samples go with it
    pub async fn delete_project(&self, project_id: Uuid, actor: Uuid) -> AppResult<()> {
        let project = self.load(project_id).await?;
        if project.created_by != actor {
            return Err(AppError::forbidden("Forbidden"));
        }

        if !self.store.delete_project(project_id).await? {
            return Err(AppError::not_found("Project"));
        }
        info!("Project {} deleted by {}", project_id, actor);

        self.update_user_projects(actor, |projects| projects.retain(|id| *id != project_id))
            .await
    }

    async fn update_user_projects<F>(&self, user_id: Uuid, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut Vec<Uuid>),
    {
        let Some(mut user) = self.store.find_user(user_id).await? else {
            warn!("User {} has no account record, project list not updated", user_id);
            return Ok(());
        };
        change(&mut user.projects);
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;
        Ok(())
    }

    pub async fn get_project(&self, project_id: Uuid) -> AppResult<ProjectDetail> {
        let project = self.load(project_id).await?;
        let sample_details = self.store.list_samples_by_project(project_id).await?;
        Ok(ProjectDetail {
            progress: progress_of(&sample_details),
            project,
            sample_details,
        })
    }

    /// Projects the user created, leads or belongs to, with their progress
    pub async fn list_projects(&self, user_id: Uuid) -> AppResult<Vec<ProjectOverview>> {
        let projects = self.store.list_projects_involving(user_id).await?;
        let mut overviews = Vec::with_capacity(projects.len());
        for project in projects {
            let samples = self.store.list_samples_by_project(project.id).await?;
            overviews.push(ProjectOverview {
                progress: progress_of(&samples),
                project,
            });
        }
        Ok(overviews)
    }

    pub async fn list_samples(&self, project_id: Uuid) -> AppResult<Vec<Sample>> {
        self.load(project_id).await?;
        self.store.list_samples_by_project(project_id).await
    }

    /// Attach a new sample to the project
    pub async fn add_sample(
        &self,
        project_id: Uuid,
        request: CreateSampleRequest,
        actor: Uuid,
        file: Option<FileDescriptor>,
    ) -> AppResult<Sample> {
        let mut project = self.load(project_id).await?;
        let fields = request.into_fields()?;
        if self
            .store
            .find_sample_by_identification(&fields.identification)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Sample identification already exists"));
        }

        let mut sample = Sample::new(project_id, fields, actor);
        sample.protocol_file = file;
        let sample = self.store.insert_sample(sample).await?;

        project.samples.push(sample.id);
        project.updated_at = Utc::now();
        self.save(&project).await?;
        info!("Sample {} added to project {}", sample.id, project_id);

        let personal = Message::new(format!(
            "Sample \"{}\" was added to project \"{}\"",
            sample.name, project.project_name
        ))
        .title("Sample Added")
        .kind(NotificationType::Success)
        .project(project_id)
        .sample(sample.id);
        self.notifier.notify_user(actor, &personal).await;

        let mut candidates = project.team();
        candidates.extend(sample.technician_responsible);
        let broadcast = Message::new(format!(
            "New sample \"{}\" added to project \"{}\"",
            sample.name, project.project_name
        ))
        .project(project_id)
        .sample(sample.id);
        self.notifier
            .notify_users(Recipients::excluding(candidates, actor), &broadcast)
            .await;

        Ok(sample)
    }

    /// Remove a sample and its reference in the owning project.
    /// Returns the deleted sample so the caller can release its file.
    pub async fn delete_sample(&self, project_id: Uuid, sample_id: Uuid) -> AppResult<Sample> {
        let mut project = self.load(project_id).await?;
        let sample = self
            .store
            .find_sample(sample_id)
            .await?
            .filter(|s| s.project_id == project_id)
            .ok_or_else(|| AppError::not_found("Sample"))?;

        self.store.delete_sample(sample_id).await?;
        project.samples.retain(|id| *id != sample_id);
        project.updated_at = Utc::now();
        self.save(&project).await?;
        info!("Sample {} removed from project {}", sample_id, project_id);

        Ok(sample)
    }

    pub async fn add_team_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        actor: Uuid,
    ) -> AppResult<Project> {
        let mut project = self.load(project_id).await?;
        let user: User = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        if project.is_team_member(user_id) {
            return Err(AppError::conflict("User is already a team member"));
        }

        project.team_members.push(user_id);
        project.updated_at = Utc::now();
        let project = self.save(&project).await?;

        let welcome = Message::new(format!(
            "You have been added to the project \"{}\"",
            project.project_name
        ))
        .title("Added to Project")
        .project(project_id);
        self.notifier
            .notify_users(Recipients::excluding([user_id], actor), &welcome)
            .await;

        let personal = Message::new(format!(
            "{} was added to the project \"{}\"",
            user.name, project.project_name
        ))
        .title("Team Member Added")
        .kind(NotificationType::Success)
        .project(project_id);
        self.notifier.notify_user(actor, &personal).await;

        Ok(project)
    }

    /// Team members are matched by user id
    pub async fn remove_team_member(
        &self,
        project_id: Uuid,
        member_id: Uuid,
        actor: Uuid,
    ) -> AppResult<Project> {
        let mut project = self.load(project_id).await?;
        if !project.is_team_member(member_id) {
            return Err(AppError::not_found_message("Member not found in project"));
        }

        project.team_members.retain(|id| *id != member_id);
        project.updated_at = Utc::now();
        let project = self.save(&project).await?;

        let notice = Message::new(format!(
            "You have been removed from the project \"{}\"",
            project.project_name
        ))
        .title("Removed from Project")
        .kind(NotificationType::Warning)
        .project(project_id);
        self.notifier
            .notify_users(Recipients::excluding([member_id], actor), &notice)
            .await;

        let member = match self.store.find_user(member_id).await {
            Ok(Some(user)) => user.name,
            _ => member_id.to_string(),
        };
        let personal = Message::new(format!(
            "{} was removed from the project \"{}\"",
            member, project.project_name
        ))
        .title("Team Member Removed")
        .project(project_id);
        self.notifier.notify_user(actor, &personal).await;

        Ok(project)
    }
}
