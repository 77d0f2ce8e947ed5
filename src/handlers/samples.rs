use super::AppState;
use crate::{
    auth::{AuthUser, Capability},
    error::AppError,
    models::{AnalysisReportView, Sample, SubmitAnalysisReportRequest, UpdateSampleStatusRequest},
    response::ApiResponse,
    storage::upload::sanitize_file_name,
};
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Json, Response},
};
use uuid::Uuid;

/// Get a sample
#[utoipa::path(
    get,
    path = "/api/samples/{id}",
    tag = "samples",
    params(("id" = Uuid, Path, description = "Sample id")),
    responses(
        (status = 200, description = "Sample found", body = Sample),
        (status = 404, description = "Sample not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_sample(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(sample_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Sample>>, AppError> {
    let sample = state.samples.get_sample(sample_id).await?;
    Ok(Json(ApiResponse::success(sample)))
}

/// Move a sample to `In Analysis` or `Analyzed`
#[utoipa::path(
    patch,
    path = "/api/samples/{id}/status",
    tag = "samples",
    params(("id" = Uuid, Path, description = "Sample id")),
    request_body = UpdateSampleStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Sample),
        (status = 400, description = "Invalid status or sample already in this status"),
        (status = 404, description = "Sample not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_sample_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(sample_id): Path<Uuid>,
    Json(request): Json<UpdateSampleStatusRequest>,
) -> Result<Json<ApiResponse<Sample>>, AppError> {
    user.require(Capability::AnalyzeSamples)?;
    let sample = state
        .samples
        .update_status(sample_id, &request.status, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(sample)))
}

/// Submit the analysis report of a sample under analysis
#[utoipa::path(
    post,
    path = "/api/samples/{id}/analysis-report",
    tag = "samples",
    params(("id" = Uuid, Path, description = "Sample id")),
    request_body = SubmitAnalysisReportRequest,
    responses(
        (status = 200, description = "Report submitted, sample analyzed", body = Sample),
        (status = 400, description = "Sample is not under analysis"),
        (status = 404, description = "Sample not found")
    ),
    security(("bearer" = []))
)]
pub async fn submit_analysis_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(sample_id): Path<Uuid>,
    Json(request): Json<SubmitAnalysisReportRequest>,
) -> Result<Json<ApiResponse<Sample>>, AppError> {
    user.require(Capability::AnalyzeSamples)?;
    let sample = state
        .samples
        .submit_analysis_report(sample_id, request.analysis_report, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        sample,
        "Analysis report submitted",
    )))
}

#[utoipa::path(
    get,
    path = "/api/samples/{id}/analysis-report",
    tag = "samples",
    params(("id" = Uuid, Path, description = "Sample id")),
    responses(
        (status = 200, description = "Analysis report", body = AnalysisReportView),
        (status = 404, description = "Sample not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_analysis_report(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(sample_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AnalysisReportView>>, AppError> {
    let report = state.samples.get_analysis_report(sample_id).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Download the protocol file attached to a sample
#[utoipa::path(
    get,
    path = "/api/samples/{id}/protocol",
    tag = "samples",
    params(("id" = Uuid, Path, description = "Sample id")),
    responses(
        (status = 200, description = "Protocol file", content_type = "application/octet-stream"),
        (status = 404, description = "Sample or protocol file not found")
    ),
    security(("bearer" = []))
)]
pub async fn download_protocol(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(sample_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let sample = state.samples.get_sample(sample_id).await?;
    let file = sample
        .protocol_file
        .ok_or_else(|| AppError::not_found("Protocol file"))?;

    let data = state.storage.download(&file.storage_path).await?;
    tracing::info!("Downloading protocol {} of sample {}", file.original_name, sample_id);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                sanitize_file_name(&file.original_name)
            ),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(axum::body::Body::from(data))
        .map_err(|e| AppError::internal(format!("Failed to build response: {}", e)))
}
