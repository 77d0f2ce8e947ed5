use super::{Entity, UserSummary, is_blank};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Sample analysis status.
///
/// Forward only: Pending -> In Analysis -> Analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sample_status_enum")]
pub enum SampleStatus {
    Pending,
    #[serde(rename = "In Analysis")]
    #[sqlx(rename = "In Analysis")]
    InAnalysis,
    Analyzed,
}

impl SampleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleStatus::Pending => "Pending",
            SampleStatus::InAnalysis => "In Analysis",
            SampleStatus::Analyzed => "Analyzed",
        }
    }

    /// Parse a status that may be requested through a status update.
    ///
    /// `Pending` is only ever the initial value and is not accepted here.
    pub fn parse_target(s: &str) -> Option<Self> {
        match s.trim() {
            "In Analysis" | "InAnalysis" => Some(SampleStatus::InAnalysis),
            "Analyzed" => Some(SampleStatus::Analyzed),
            _ => None,
        }
    }
}

impl Default for SampleStatus {
    fn default() -> Self {
        SampleStatus::Pending
    }
}

impl std::fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored file attached to a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub original_name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size: u64,
}

/// Biological sample
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    /// Unique across all samples
    pub identification: String,
    pub sample_type: Option<String>,
    pub origin: Option<String>,
    pub collection_date: Option<DateTime<Utc>>,
    pub storage_conditions: Option<String>,
    pub status: SampleStatus,
    pub protocol_file: Option<FileDescriptor>,
    pub analysis_report: Option<String>,
    pub technician_responsible: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Sample {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Sample {
    pub fn new(project_id: Uuid, fields: SampleFields, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: fields.name,
            identification: fields.identification,
            sample_type: fields.sample_type,
            origin: fields.origin,
            collection_date: fields.collection_date,
            storage_conditions: fields.storage_conditions,
            status: SampleStatus::Pending,
            protocol_file: None,
            analysis_report: None,
            technician_responsible: fields.technician_responsible,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `sampleData` part of the add-sample request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSampleRequest {
    pub name: Option<String>,
    pub identification: Option<String>,
    pub sample_type: Option<String>,
    pub origin: Option<String>,
    pub collection_date: Option<DateTime<Utc>>,
    pub storage_conditions: Option<String>,
    pub technician_responsible: Option<Uuid>,
}

/// Validated sample fields
#[derive(Debug, Clone)]
pub struct SampleFields {
    pub name: String,
    pub identification: String,
    pub sample_type: Option<String>,
    pub origin: Option<String>,
    pub collection_date: Option<DateTime<Utc>>,
    pub storage_conditions: Option<String>,
    pub technician_responsible: Option<Uuid>,
}

impl CreateSampleRequest {
    pub fn into_fields(self) -> AppResult<SampleFields> {
        if is_blank(&self.name) || is_blank(&self.identification) {
            return Err(AppError::validation(
                "Sample name and identification are required",
            ));
        }
        Ok(SampleFields {
            name: self.name.unwrap_or_default().trim().to_string(),
            identification: self.identification.unwrap_or_default().trim().to_string(),
            sample_type: self.sample_type,
            origin: self.origin,
            collection_date: self.collection_date,
            storage_conditions: self.storage_conditions,
            technician_responsible: self.technician_responsible,
        })
    }
}

/// Status update request; the value is validated by the service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSampleStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnalysisReportRequest {
    #[serde(default)]
    pub analysis_report: String,
}

/// Read-only projection of a sample's analysis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReportView {
    pub name: String,
    pub analysis_report: Option<String>,
    pub status: SampleStatus,
    pub updated_at: DateTime<Utc>,
    pub technician: Option<UserSummary>,
}
