//! Final report workflow of a project.
//!
//! Drafts and uploads append to the version history; publishing only
//! replaces the working copy.

use super::{
    dispatcher::{Message, Recipients},
    projects::ProjectService,
};
use crate::{
    error::{AppError, AppResult},
    models::{FinalReport, NotificationType, ReportStatus, ReportVersion, ReportVersionType},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

fn require_content(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::validation("Report content is required"));
    }
    Ok(())
}

impl ProjectService {
    pub async fn final_report(&self, project_id: Uuid) -> AppResult<Option<FinalReport>> {
        Ok(self.load(project_id).await?.final_report)
    }

    /// Record the content as a manual version and make it the draft
    pub async fn save_draft(
        &self,
        project_id: Uuid,
        content: String,
        actor: Uuid,
    ) -> AppResult<FinalReport> {
        require_content(&content)?;
        self.write_draft(project_id, content, ReportVersionType::Manual, None, actor)
            .await
    }

    /// Record an uploaded report as a version and make it the draft
    pub async fn upload_report(
        &self,
        project_id: Uuid,
        content: String,
        file_name: String,
        actor: Uuid,
    ) -> AppResult<FinalReport> {
        require_content(&content)?;
        self.write_draft(
            project_id,
            content,
            ReportVersionType::Upload,
            Some(file_name),
            actor,
        )
        .await
    }

    async fn write_draft(
        &self,
        project_id: Uuid,
        content: String,
        version_type: ReportVersionType,
        file_name: Option<String>,
        actor: Uuid,
    ) -> AppResult<FinalReport> {
        let mut project = self.load(project_id).await?;
        let now = Utc::now();

        project.report_versions.push(ReportVersion::new(
            content.clone(),
            version_type,
            file_name,
            actor,
        ));
        let report = FinalReport {
            content,
            status: ReportStatus::Draft,
            last_edited_by: actor,
            updated_at: now,
            published_at: None,
            published_by: None,
        };
        project.final_report = Some(report.clone());
        project.updated_at = now;
        self.save(&project).await?;

        info!(
            "Final report draft of project {} saved by {} ({} versions)",
            project_id,
            actor,
            project.report_versions.len()
        );
        Ok(report)
    }

    /// Publish the given content, or the current draft when none is given.
    ///
    /// The version history is left untouched.
    pub async fn publish_report(
        &self,
        project_id: Uuid,
        content: Option<String>,
        actor: Uuid,
    ) -> AppResult<FinalReport> {
        let mut project = self.load(project_id).await?;
        let content = content
            .filter(|c| !c.trim().is_empty())
            .or_else(|| project.final_report.as_ref().map(|r| r.content.clone()))
            .ok_or_else(|| AppError::validation("Report content is required"))?;

        let now = Utc::now();
        let report = FinalReport {
            content,
            status: ReportStatus::Published,
            last_edited_by: actor,
            updated_at: now,
            published_at: Some(now),
            published_by: Some(actor),
        };
        project.final_report = Some(report.clone());
        project.updated_at = now;
        self.save(&project).await?;
        info!("Final report of project {} published by {}", project_id, actor);

        let personal = Message::new(format!(
            "The final report of \"{}\" has been published",
            project.project_name
        ))
        .title("Report Published")
        .kind(NotificationType::Success)
        .project(project_id);
        self.notifier.notify_user(actor, &personal).await;

        let mut candidates = project.team();
        candidates.push(project.created_by);
        let broadcast = Message::new(format!(
            "The final report of \"{}\" is now available",
            project.project_name
        ))
        .title("Final Report Published")
        .project(project_id);
        self.notifier
            .notify_users(Recipients::excluding(candidates, actor), &broadcast)
            .await;

        Ok(report)
    }

    pub async fn report_versions(&self, project_id: Uuid) -> AppResult<Vec<ReportVersion>> {
        Ok(self.load(project_id).await?.report_versions)
    }

    pub async fn report_version(
        &self,
        project_id: Uuid,
        version_id: Uuid,
    ) -> AppResult<ReportVersion> {
        self.load(project_id)
            .await?
            .find_version(version_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Report version"))
    }
}
