use super::{AppState, form::read_form};
use crate::{
    auth::{AuthUser, Capability},
    error::{AppError, AppResult},
    models::{
        AddTeamMemberRequest, CreateSampleRequest, Project, ProjectDetail, ProjectOverview,
        ProjectRequest, ProjectStatistics, Sample,
    },
    repositories::SampleRepository,
    response::ApiResponse,
    services::statistics_for,
};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use uuid::Uuid;

/// Storage prefix of sample protocol files
const PROTOCOL_PREFIX: &str = "protocols";

/// List the caller's projects
///
/// Projects the caller created, leads or belongs to, newest first, each with
/// its analysis progress.
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Projects of the caller", body = Vec<ProjectOverview>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ProjectOverview>>>, AppError> {
    let projects = state.projects.list_projects(user.user_id).await?;
    Ok(Json(ApiResponse::success(projects)))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Missing fields or duplicate project name"),
        (status = 403, description = "Role may not manage projects")
    ),
    security(("bearer" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ProjectRequest>,
) -> AppResult<ApiResponse<Project>> {
    user.require(Capability::ManageProjects)?;
    let project = state.projects.create_project(request, user.user_id).await?;
    Ok(ApiResponse::created(project))
}

/// Get a project with its samples
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = ProjectDetail),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_project(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectDetail>>, AppError> {
    let project = state.projects.get_project(project_id).await?;
    Ok(Json(ApiResponse::success(project)))
}

/// Replace a project's fields
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Missing fields or duplicate project name"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<ProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    user.require(Capability::ManageProjects)?;
    let project = state.projects.update_project(project_id, request).await?;
    Ok(Json(ApiResponse::success(project)))
}

/// Delete a project and its samples. Only its creator may do so.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Capability::ManageProjects)?;

    let samples = state.store.list_samples_by_project(project_id).await?;
    state.projects.delete_project(project_id, user.user_id).await?;
    for sample in samples {
        release_protocol_file(&state, &sample).await;
    }

    Ok(Json(ApiResponse::success_with_message(
        (),
        "Project deleted successfully",
    )))
}

/// Samples of a project, oldest first
#[utoipa::path(
    get,
    path = "/api/projects/{id}/samples",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Samples of the project", body = Vec<Sample>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn list_project_samples(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Sample>>>, AppError> {
    let samples = state.projects.list_samples(project_id).await?;
    Ok(Json(ApiResponse::success(samples)))
}

/// Add a sample to a project
///
/// Multipart body: a `sampleData` part holding the sample as JSON and an
/// optional `file` part with the protocol document.
#[utoipa::path(
    post,
    path = "/api/projects/{id}/samples",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body(content = CreateSampleRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Sample created", body = Sample),
        (status = 400, description = "Invalid sample data or duplicate identification"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn add_sample(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<Sample>> {
    user.require(Capability::ManageProjects)?;

    let form = read_form(&mut multipart, "file").await?;
    let request: CreateSampleRequest = form
        .json("sampleData")?
        .ok_or_else(|| AppError::validation("Missing sampleData"))?;

    let descriptor = match &form.file {
        Some(file) => Some(
            file.store(
                state.storage.as_ref(),
                PROTOCOL_PREFIX,
                state.config.file.max_size,
            )
            .await?,
        ),
        None => None,
    };
    let stored_path = descriptor.as_ref().map(|d| d.storage_path.clone());

    match state
        .projects
        .add_sample(project_id, request, user.user_id, descriptor)
        .await
    {
        Ok(sample) => Ok(ApiResponse::created(sample)),
        Err(e) => {
            if let Some(path) = stored_path {
                if let Err(cleanup) = state.storage.delete(&path).await {
                    tracing::warn!("Failed to remove orphaned upload {}: {}", path, cleanup);
                }
            }
            Err(e)
        }
    }
}

/// Remove a sample from a project
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/samples/{sample_id}",
    tag = "projects",
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("sample_id" = Uuid, Path, description = "Sample id")
    ),
    responses(
        (status = 200, description = "Sample deleted"),
        (status = 404, description = "Project or sample not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_sample(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, sample_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Capability::ManageProjects)?;
    let sample = state.projects.delete_sample(project_id, sample_id).await?;
    release_protocol_file(&state, &sample).await;

    Ok(Json(ApiResponse::success_with_message(
        (),
        "Sample deleted successfully",
    )))
}

async fn release_protocol_file(state: &AppState, sample: &Sample) {
    if let Some(file) = &sample.protocol_file {
        if let Err(e) = state.storage.delete(&file.storage_path).await {
            tracing::warn!(
                "Failed to delete protocol file of sample {}: {}",
                sample.id,
                e
            );
        }
    }
}

/// Add a user to the project team
#[utoipa::path(
    post,
    path = "/api/projects/{id}/team",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = AddTeamMemberRequest,
    responses(
        (status = 200, description = "Member added", body = Project),
        (status = 400, description = "User already in the team"),
        (status = 404, description = "Project or user not found")
    ),
    security(("bearer" = []))
)]
pub async fn add_team_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<AddTeamMemberRequest>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    user.require(Capability::ManageProjects)?;
    let project = state
        .projects
        .add_team_member(project_id, request.user_id, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(project)))
}

/// Remove a user from the project team
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/team/{member_id}",
    tag = "projects",
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("member_id" = Uuid, Path, description = "User id of the member")
    ),
    responses(
        (status = 200, description = "Member removed", body = Project),
        (status = 404, description = "Project not found or user not in the team")
    ),
    security(("bearer" = []))
)]
pub async fn remove_team_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    user.require(Capability::ManageProjects)?;
    let project = state
        .projects
        .remove_team_member(project_id, member_id, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(project)))
}

/// Dashboard statistics over the projects created by the caller
#[utoipa::path(
    get,
    path = "/api/statistics",
    tag = "projects",
    responses(
        (status = 200, description = "Aggregated statistics", body = ProjectStatistics)
    ),
    security(("bearer" = []))
)]
pub async fn get_statistics(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<ProjectStatistics>>, AppError> {
    let stats = statistics_for(state.store.as_ref(), user.user_id).await?;
    Ok(Json(ApiResponse::success(stats)))
}
