use super::{Entity, Sample, is_blank};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Project status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "project_status_enum")]
pub enum ProjectStatus {
    Planning,
    Active,
    Completed,
    #[serde(rename = "On Hold")]
    #[sqlx(rename = "On Hold")]
    OnHold,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Planning
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final report publication state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Published,
}

/// The working copy of a project's final report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub content: String,
    pub status: ReportStatus,
    pub last_edited_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub published_by: Option<Uuid>,
}

/// How a report version entered the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportVersionType {
    Manual,
    Upload,
}

/// Entry of the append-only report history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportVersion {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub version_type: ReportVersionType,
    /// Original name of the uploaded file, for `upload` versions
    pub file_name: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ReportVersion {
    pub fn new(
        content: String,
        version_type: ReportVersionType,
        file_name: Option<String>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            version_type,
            file_name,
            created_by,
            created_at: Utc::now(),
        }
    }
}

/// Research project
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    /// Unique across all projects
    pub project_name: String,
    pub research_domain: String,
    pub description: String,
    pub team_lead: Uuid,
    pub team_members: Vec<Uuid>,
    pub start_date: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub budget: Option<f64>,
    pub status: ProjectStatus,
    /// Owned samples, in insertion order
    pub samples: Vec<Uuid>,
    pub created_by: Uuid,
    pub final_report: Option<FinalReport>,
    pub report_versions: Vec<ReportVersion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Project {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Project {
    pub fn new(fields: ProjectFields, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_name: fields.project_name,
            research_domain: fields.research_domain,
            description: fields.description,
            team_lead: fields.team_lead,
            team_members: fields.team_members,
            start_date: fields.start_date,
            deadline: fields.deadline,
            budget: fields.budget,
            status: fields.status.unwrap_or_default(),
            samples: Vec::new(),
            created_by,
            final_report: None,
            report_versions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field. Omitted optional fields are cleared
    /// (budget) or kept (status).
    pub fn replace_fields(&mut self, fields: ProjectFields) {
        self.project_name = fields.project_name;
        self.research_domain = fields.research_domain;
        self.description = fields.description;
        self.team_lead = fields.team_lead;
        self.team_members = fields.team_members;
        self.start_date = fields.start_date;
        self.deadline = fields.deadline;
        self.budget = fields.budget;
        if let Some(status) = fields.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    /// Team lead followed by the team members, without duplicates
    pub fn team(&self) -> Vec<Uuid> {
        let mut team = vec![self.team_lead];
        for member in &self.team_members {
            if !team.contains(member) {
                team.push(*member);
            }
        }
        team
    }

    pub fn is_team_member(&self, user_id: Uuid) -> bool {
        self.team_members.contains(&user_id)
    }

    /// Whether the user created, leads or belongs to the project
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.created_by == user_id || self.team_lead == user_id || self.is_team_member(user_id)
    }

    pub fn find_version(&self, version_id: Uuid) -> Option<&ReportVersion> {
        self.report_versions.iter().find(|v| v.id == version_id)
    }
}

/// Create/update project request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub project_name: Option<String>,
    pub research_domain: Option<String>,
    pub team_lead: Option<Uuid>,
    #[serde(default)]
    pub team_members: Vec<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub status: Option<ProjectStatus>,
}

/// Validated project fields
#[derive(Debug, Clone)]
pub struct ProjectFields {
    pub project_name: String,
    pub research_domain: String,
    pub team_lead: Uuid,
    pub team_members: Vec<Uuid>,
    pub start_date: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub description: String,
    pub budget: Option<f64>,
    pub status: Option<ProjectStatus>,
}

impl ProjectRequest {
    /// Check the required fields and produce the validated form
    pub fn into_fields(self) -> AppResult<ProjectFields> {
        let mut missing = Vec::new();
        if is_blank(&self.project_name) {
            missing.push("projectName");
        }
        if is_blank(&self.research_domain) {
            missing.push("researchDomain");
        }
        if self.team_lead.is_none() {
            missing.push("teamLead");
        }
        if self.start_date.is_none() {
            missing.push("startDate");
        }
        if self.deadline.is_none() {
            missing.push("deadline");
        }
        if is_blank(&self.description) {
            missing.push("description");
        }

        match (
            self.project_name,
            self.research_domain,
            self.team_lead,
            self.start_date,
            self.deadline,
            self.description,
        ) {
            (
                Some(project_name),
                Some(research_domain),
                Some(team_lead),
                Some(start_date),
                Some(deadline),
                Some(description),
            ) if missing.is_empty() => Ok(ProjectFields {
                project_name: project_name.trim().to_string(),
                research_domain,
                team_lead,
                team_members: self.team_members,
                start_date,
                deadline,
                description,
                budget: self.budget,
                status: self.status,
            }),
            _ => Err(AppError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

/// Project listing entry
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    #[serde(flatten)]
    pub project: Project,
    /// Percentage of analyzed samples
    pub progress: u8,
}

/// Project with its samples expanded
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub sample_details: Vec<Sample>,
    pub progress: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamMemberRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportContentRequest {
    pub content: String,
}

/// Publish body; without content the current draft is published
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishReportRequest {
    #[serde(default)]
    pub content: Option<String>,
}
