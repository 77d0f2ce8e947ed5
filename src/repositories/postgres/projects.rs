use super::{PgStore, conflict_on_unique};
use crate::{
    error::AppResult,
    models::{FinalReport, Project, ProjectStatus, ReportVersion},
    repositories::ProjectRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    project_name: String,
    research_domain: String,
    description: String,
    team_lead: Uuid,
    team_members: Vec<Uuid>,
    start_date: DateTime<Utc>,
    deadline: DateTime<Utc>,
    budget: Option<f64>,
    status: ProjectStatus,
    samples: Vec<Uuid>,
    created_by: Uuid,
    final_report: Option<Json<FinalReport>>,
    report_versions: Json<Vec<ReportVersion>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            project_name: row.project_name,
            research_domain: row.research_domain,
            description: row.description,
            team_lead: row.team_lead,
            team_members: row.team_members,
            start_date: row.start_date,
            deadline: row.deadline,
            budget: row.budget,
            status: row.status,
            samples: row.samples,
            created_by: row.created_by,
            final_report: row.final_report.map(|r| r.0),
            report_versions: row.report_versions.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn insert_project(&self, project: Project) -> AppResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (
                id, project_name, research_domain, description, team_lead, team_members,
                start_date, deadline, budget, status, samples, created_by,
                final_report, report_versions, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING
                id, project_name, research_domain, description, team_lead, team_members,
                start_date, deadline, budget, status, samples, created_by,
                final_report, report_versions, created_at, updated_at
            "#,
        )
        .bind(project.id)
        .bind(&project.project_name)
        .bind(&project.research_domain)
        .bind(&project.description)
        .bind(project.team_lead)
        .bind(&project.team_members)
        .bind(project.start_date)
        .bind(project.deadline)
        .bind(project.budget)
        .bind(project.status)
        .bind(&project.samples)
        .bind(project.created_by)
        .bind(project.final_report.as_ref().map(Json))
        .bind(Json(&project.report_versions))
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "Project already exists"))?;

        Ok(row.into())
    }

    async fn find_project(&self, id: Uuid) -> AppResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT
                id, project_name, research_domain, description, team_lead, team_members,
                start_date, deadline, budget, status, samples, created_by,
                final_report, report_versions, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_project_by_name(&self, name: &str) -> AppResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT
                id, project_name, research_domain, description, team_lead, team_members,
                start_date, deadline, budget, status, samples, created_by,
                final_report, report_versions, created_at, updated_at
            FROM projects
            WHERE project_name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_projects_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT
                id, project_name, research_domain, description, team_lead, team_members,
                start_date, deadline, budget, status, samples, created_by,
                final_report, report_versions, created_at, updated_at
            FROM projects
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_projects_involving(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT
                id, project_name, research_domain, description, team_lead, team_members,
                start_date, deadline, budget, status, samples, created_by,
                final_report, report_versions, created_at, updated_at
            FROM projects
            WHERE created_by = $1 OR team_lead = $1 OR $1 = ANY(team_members)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_project(&self, project: &Project) -> AppResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects SET
                project_name = $2,
                research_domain = $3,
                description = $4,
                team_lead = $5,
                team_members = $6,
                start_date = $7,
                deadline = $8,
                budget = $9,
                status = $10,
                samples = $11,
                final_report = $12,
                report_versions = $13,
                updated_at = $14
            WHERE id = $1
            RETURNING
                id, project_name, research_domain, description, team_lead, team_members,
                start_date, deadline, budget, status, samples, created_by,
                final_report, report_versions, created_at, updated_at
            "#,
        )
        .bind(project.id)
        .bind(&project.project_name)
        .bind(&project.research_domain)
        .bind(&project.description)
        .bind(project.team_lead)
        .bind(&project.team_members)
        .bind(project.start_date)
        .bind(project.deadline)
        .bind(project.budget)
        .bind(project.status)
        .bind(&project.samples)
        .bind(project.final_report.as_ref().map(Json))
        .bind(Json(&project.report_versions))
        .bind(project.updated_at)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "Project already exists"))?;

        Ok(row.map(Into::into))
    }

    async fn delete_project(&self, id: Uuid) -> AppResult<bool> {
        // samples follow through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
