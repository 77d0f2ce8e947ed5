use super::{AppState, form::read_form};
use crate::{
    auth::{AuthUser, Capability},
    error::AppError,
    models::{FinalReport, PublishReportRequest, ReportContentRequest, ReportVersion},
    response::ApiResponse,
};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use uuid::Uuid;

/// Current final report of a project, `null` when none was written yet
#[utoipa::path(
    get,
    path = "/api/projects/{id}/final-report",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Final report", body = Option<FinalReport>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_final_report(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<FinalReport>>>, AppError> {
    let report = state.projects.final_report(project_id).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Save the final report as a draft and record a manual version
#[utoipa::path(
    put,
    path = "/api/projects/{id}/final-report/draft",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = ReportContentRequest,
    responses(
        (status = 200, description = "Draft saved", body = FinalReport),
        (status = 400, description = "Empty content"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn save_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<ReportContentRequest>,
) -> Result<Json<ApiResponse<FinalReport>>, AppError> {
    user.require(Capability::ManageProjects)?;
    let report = state
        .projects
        .save_draft(project_id, request.content, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(report, "Draft saved")))
}

/// Publish the final report
///
/// Publishes the given content, or the current draft when the body is
/// missing or has no content.
#[utoipa::path(
    post,
    path = "/api/projects/{id}/final-report/publish",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body(content = PublishReportRequest, description = "Optional; without a body the draft is published"),
    responses(
        (status = 200, description = "Report published", body = FinalReport),
        (status = 400, description = "Nothing to publish"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn publish_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    request: Option<Json<PublishReportRequest>>,
) -> Result<Json<ApiResponse<FinalReport>>, AppError> {
    user.require(Capability::ManageProjects)?;
    let request = request.map(|Json(body)| body).unwrap_or_default();
    let report = state
        .projects
        .publish_report(project_id, request.content, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        report,
        "Report published",
    )))
}

/// Upload a text file as the new draft of the final report
#[utoipa::path(
    post,
    path = "/api/projects/{id}/final-report/upload",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body(content = String, content_type = "multipart/form-data", description = "`file` part with UTF-8 text"),
    responses(
        (status = 200, description = "Report uploaded", body = FinalReport),
        (status = 400, description = "Missing, empty or non-text file"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn upload_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FinalReport>>, AppError> {
    user.require(Capability::ManageProjects)?;

    let form = read_form(&mut multipart, "file").await?;
    let file = form
        .file
        .ok_or_else(|| AppError::validation("Missing report file"))?;
    file.validate(state.config.file.max_size)?;
    let content = file.text()?;

    let report = state
        .projects
        .upload_report(project_id, content, file.file_name, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        report,
        "Report uploaded",
    )))
}

/// Version history of the final report, oldest first
#[utoipa::path(
    get,
    path = "/api/projects/{id}/final-report/versions",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Report versions", body = Vec<ReportVersion>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn list_versions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReportVersion>>>, AppError> {
    let versions = state.projects.report_versions(project_id).await?;
    Ok(Json(ApiResponse::success(versions)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}/final-report/versions/{version_id}",
    tag = "reports",
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("version_id" = Uuid, Path, description = "Report version id")
    ),
    responses(
        (status = 200, description = "Report version", body = ReportVersion),
        (status = 404, description = "Project or version not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_version(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((project_id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<ReportVersion>>, AppError> {
    let version = state.projects.report_version(project_id, version_id).await?;
    Ok(Json(ApiResponse::success(version)))
}
