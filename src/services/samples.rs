use super::dispatcher::{Message, NotificationDispatcher, Recipients};
use crate::{
    error::{AppError, AppResult},
    models::{AnalysisReportView, NotificationType, ProjectStatus, Sample, SampleStatus, UserSummary},
    repositories::{ProjectRepository, SampleRepository, Store, UserRepository},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const REPORT_REQUIRES_ANALYSIS: &str =
    "Le rapport d'analyse ne peut être soumis que pour un échantillon en cours d'analyse";

/// Sample status transitions and analysis reports
#[derive(Clone)]
pub struct SampleService {
    store: Arc<dyn Store>,
    notifier: NotificationDispatcher,
}

impl SampleService {
    pub fn new(store: Arc<dyn Store>, notifier: NotificationDispatcher) -> Self {
        Self { store, notifier }
    }

    pub async fn get_sample(&self, sample_id: Uuid) -> AppResult<Sample> {
        self.store
            .find_sample(sample_id)
            .await?
            .ok_or_else(|| AppError::not_found("Sample"))
    }

    async fn save(&self, sample: &Sample) -> AppResult<Sample> {
        self.store
            .update_sample(sample)
            .await?
            .ok_or_else(|| AppError::not_found("Sample"))
    }

    /// Move a sample forward to `In Analysis` or `Analyzed`
    pub async fn update_status(
        &self,
        sample_id: Uuid,
        requested: &str,
        actor: Uuid,
    ) -> AppResult<Sample> {
        let mut sample = self.get_sample(sample_id).await?;
        let project = self
            .store
            .find_project(sample.project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))?;

        let target = SampleStatus::parse_target(requested)
            .ok_or_else(|| AppError::validation("Invalid status provided"))?;
        if sample.status == target {
            return Err(AppError::invalid_transition("Sample already in this status"));
        }
        if sample.status == SampleStatus::Analyzed {
            return Err(AppError::invalid_transition(
                "Sample analysis is already complete",
            ));
        }

        // A failed activation must leave the sample untouched
        if target == SampleStatus::InAnalysis {
            self.ensure_project_active(sample.project_id).await?;
        }

        let previous = sample.status;
        sample.status = target;
        sample.updated_at = Utc::now();
        let sample = self.save(&sample).await?;
        info!(
            "Sample {} moved from {} to {} by {}",
            sample.id, previous, target, actor
        );

        let personal = match target {
            SampleStatus::InAnalysis => Message::new(format!(
                "You started the analysis of sample \"{}\"",
                sample.name
            ))
            .title("Analysis Started")
            .kind(NotificationType::Info),
            _ => Message::new(format!(
                "You completed the analysis of sample \"{}\"",
                sample.name
            ))
            .title("Analysis Complete")
            .kind(NotificationType::Success),
        }
        .project(project.id)
        .sample(sample.id);
        self.notifier.notify_user(actor, &personal).await;

        let broadcast = Message::new(format!(
            "Sample \"{}\" of project \"{}\" is now {}",
            sample.name, project.project_name, target
        ))
        .title("Sample Status Updated")
        .project(project.id)
        .sample(sample.id);
        self.notifier
            .notify_users(Recipients::excluding(project.team(), actor), &broadcast)
            .await;

        Ok(sample)
    }

    /// Attach the analysis report and mark the sample analyzed
    pub async fn submit_analysis_report(
        &self,
        sample_id: Uuid,
        report: String,
        actor: Uuid,
    ) -> AppResult<Sample> {
        let mut sample = self.get_sample(sample_id).await?;
        if sample.status != SampleStatus::InAnalysis {
            return Err(AppError::validation(REPORT_REQUIRES_ANALYSIS));
        }
        if report.trim().is_empty() {
            return Err(AppError::validation("Analysis report is required"));
        }

        self.ensure_project_active(sample.project_id).await?;

        sample.analysis_report = Some(report);
        sample.status = SampleStatus::Analyzed;
        sample.updated_at = Utc::now();
        let sample = self.save(&sample).await?;
        info!("Analysis report submitted for sample {} by {}", sample.id, actor);

        let personal = Message::new(format!(
            "Your analysis report for sample \"{}\" has been submitted",
            sample.name
        ))
        .title("Report Submitted")
        .kind(NotificationType::Success)
        .project(sample.project_id)
        .sample(sample.id);
        self.notifier.notify_user(actor, &personal).await;

        if let Some(project) = self.store.find_project(sample.project_id).await? {
            let mut candidates = project.team();
            candidates.push(project.created_by);
            let broadcast = Message::new(format!(
                "An analysis report was submitted for sample \"{}\" of project \"{}\"",
                sample.name, project.project_name
            ))
            .title("Analysis Report Submitted")
            .project(project.id)
            .sample(sample.id);
            self.notifier
                .notify_users(Recipients::excluding(candidates, actor), &broadcast)
                .await;
        }

        Ok(sample)
    }

    pub async fn get_analysis_report(&self, sample_id: Uuid) -> AppResult<AnalysisReportView> {
        let sample = self.get_sample(sample_id).await?;
        let technician = match sample.technician_responsible {
            Some(id) => self
                .store
                .find_user(id)
                .await?
                .map(|user| UserSummary::from(&user)),
            None => None,
        };

        Ok(AnalysisReportView {
            name: sample.name,
            analysis_report: sample.analysis_report,
            status: sample.status,
            updated_at: sample.updated_at,
            technician,
        })
    }

    /// Set the project Active unless it already is; missing projects are ignored
    pub async fn ensure_project_active(&self, project_id: Uuid) -> AppResult<()> {
        let Some(mut project) = self.store.find_project(project_id).await? else {
            return Ok(());
        };
        if project.status == ProjectStatus::Active {
            return Ok(());
        }

        debug!("Project {} becomes Active (was {})", project_id, project.status);
        project.status = ProjectStatus::Active;
        project.updated_at = Utc::now();
        self.store.update_project(&project).await?;
        Ok(())
    }
}
