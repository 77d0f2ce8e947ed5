use super::{PgStore, conflict_on_unique};
use crate::{
    error::AppResult,
    models::{FileDescriptor, Sample, SampleStatus},
    repositories::SampleRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct SampleRow {
    id: Uuid,
    project_id: Uuid,
    name: String,
    identification: String,
    sample_type: Option<String>,
    origin: Option<String>,
    collection_date: Option<DateTime<Utc>>,
    storage_conditions: Option<String>,
    status: SampleStatus,
    protocol_file: Option<Json<FileDescriptor>>,
    analysis_report: Option<String>,
    technician_responsible: Option<Uuid>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SampleRow> for Sample {
    fn from(row: SampleRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            identification: row.identification,
            sample_type: row.sample_type,
            origin: row.origin,
            collection_date: row.collection_date,
            storage_conditions: row.storage_conditions,
            status: row.status,
            protocol_file: row.protocol_file.map(|f| f.0),
            analysis_report: row.analysis_report,
            technician_responsible: row.technician_responsible,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SampleRepository for PgStore {
    async fn insert_sample(&self, sample: Sample) -> AppResult<Sample> {
        let row = sqlx::query_as::<_, SampleRow>(
            r#"
            INSERT INTO samples (
                id, project_id, name, identification, sample_type, origin, collection_date,
                storage_conditions, status, protocol_file, analysis_report,
                technician_responsible, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING
                id, project_id, name, identification, sample_type, origin, collection_date,
                storage_conditions, status, protocol_file, analysis_report,
                technician_responsible, created_by, created_at, updated_at
            "#,
        )
        .bind(sample.id)
        .bind(sample.project_id)
        .bind(&sample.name)
        .bind(&sample.identification)
        .bind(&sample.sample_type)
        .bind(&sample.origin)
        .bind(sample.collection_date)
        .bind(&sample.storage_conditions)
        .bind(sample.status)
        .bind(sample.protocol_file.as_ref().map(Json))
        .bind(&sample.analysis_report)
        .bind(sample.technician_responsible)
        .bind(sample.created_by)
        .bind(sample.created_at)
        .bind(sample.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "Sample identification already exists"))?;

        Ok(row.into())
    }

    async fn find_sample(&self, id: Uuid) -> AppResult<Option<Sample>> {
        let row = sqlx::query_as::<_, SampleRow>(
            r#"
            SELECT
                id, project_id, name, identification, sample_type, origin, collection_date,
                storage_conditions, status, protocol_file, analysis_report,
                technician_responsible, created_by, created_at, updated_at
            FROM samples
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_sample_by_identification(
        &self,
        identification: &str,
    ) -> AppResult<Option<Sample>> {
        let row = sqlx::query_as::<_, SampleRow>(
            r#"
            SELECT
                id, project_id, name, identification, sample_type, origin, collection_date,
                storage_conditions, status, protocol_file, analysis_report,
                technician_responsible, created_by, created_at, updated_at
            FROM samples
            WHERE identification = $1
            "#,
        )
        .bind(identification)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_samples_by_project(&self, project_id: Uuid) -> AppResult<Vec<Sample>> {
        let rows = sqlx::query_as::<_, SampleRow>(
            r#"
            SELECT
                id, project_id, name, identification, sample_type, origin, collection_date,
                storage_conditions, status, protocol_file, analysis_report,
                technician_responsible, created_by, created_at, updated_at
            FROM samples
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_sample(&self, sample: &Sample) -> AppResult<Option<Sample>> {
        let row = sqlx::query_as::<_, SampleRow>(
            r#"
            UPDATE samples SET
                name = $2,
                identification = $3,
                sample_type = $4,
                origin = $5,
                collection_date = $6,
                storage_conditions = $7,
                status = $8,
                protocol_file = $9,
                analysis_report = $10,
                technician_responsible = $11,
                updated_at = $12
            WHERE id = $1
            RETURNING
                id, project_id, name, identification, sample_type, origin, collection_date,
                storage_conditions, status, protocol_file, analysis_report,
                technician_responsible, created_by, created_at, updated_at
            "#,
        )
        .bind(sample.id)
        .bind(&sample.name)
        .bind(&sample.identification)
        .bind(&sample.sample_type)
        .bind(&sample.origin)
        .bind(sample.collection_date)
        .bind(&sample.storage_conditions)
        .bind(sample.status)
        .bind(sample.protocol_file.as_ref().map(Json))
        .bind(&sample.analysis_report)
        .bind(sample.technician_responsible)
        .bind(sample.updated_at)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "Sample identification already exists"))?;

        Ok(row.map(Into::into))
    }

    async fn delete_sample(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM samples WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
