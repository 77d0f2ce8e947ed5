use super::AppState;
use crate::{
    auth::{AuthUser, Capability},
    error::{AppError, AppResult},
    models::{CreateUserRequest, User},
    repositories::UserRepository,
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

/// Register a user account record
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid data or email already registered"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<ApiResponse<User>> {
    caller.require(Capability::ManageUsers)?;

    let user = request.into_user()?;
    if state.store.find_user_by_email(&user.email).await?.is_some() {
        return Err(AppError::conflict("User already exists"));
    }
    let user = state.store.insert_user(user).await?;
    tracing::info!("User {} registered as {}", user.id, user.role);

    Ok(ApiResponse::created(user))
}

/// Account of the caller
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 404, description = "No account record for the token subject")
    ),
    security(("bearer" = []))
)]
pub async fn current_user(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state
        .store
        .find_user(caller.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(ApiResponse::success(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(ApiResponse::success(user)))
}
