use super::AppState;
use crate::{
    auth::AuthUser,
    error::AppError,
    models::{MarkAllReadResult, Notification, NotificationView, UnreadCount},
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

/// The caller's most recent notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "Notifications", body = Vec<NotificationView>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<NotificationView>>>, AppError> {
    let notifications = state.notifications.list_for_user(user.user_id).await?;
    Ok(Json(ApiResponse::success(notifications)))
}

#[utoipa::path(
    get,
    path = "/api/notifications/count",
    tag = "notifications",
    responses((status = 200, description = "Unread notifications", body = UnreadCount)),
    security(("bearer" = []))
)]
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UnreadCount>>, AppError> {
    let count = state.notifications.unread_count(user.user_id).await?;
    Ok(Json(ApiResponse::success(UnreadCount { count })))
}

/// Mark one of the caller's notifications as read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer" = []))
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>, AppError> {
    let notification = state
        .notifications
        .mark_read(notification_id, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(notification)))
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    tag = "notifications",
    responses((status = 200, description = "All notifications read", body = MarkAllReadResult)),
    security(("bearer" = []))
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<MarkAllReadResult>>, AppError> {
    let modified = state.notifications.mark_all_read(user.user_id).await?;
    Ok(Json(ApiResponse::success(MarkAllReadResult { modified })))
}
