use crate::{
    docs::ApiDoc,
    handlers::{AppState, health, notifications, projects, reports, samples, users},
};
use axum::{
    Json, Router,
    routing::{delete, get, patch, post, put},
};
use utoipa::OpenApi;

/// Business API routes
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        // Users
        .route("/api/users", post(users::create_user))
        .route("/api/users/me", get(users::current_user))
        .route("/api/users/{id}", get(users::get_user))
        // Projects
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/api/projects/{id}/samples",
            get(projects::list_project_samples).post(projects::add_sample),
        )
        .route(
            "/api/projects/{id}/samples/{sample_id}",
            delete(projects::delete_sample),
        )
        .route("/api/projects/{id}/team", post(projects::add_team_member))
        .route(
            "/api/projects/{id}/team/{member_id}",
            delete(projects::remove_team_member),
        )
        .route("/api/statistics", get(projects::get_statistics))
        // Final report
        .route(
            "/api/projects/{id}/final-report",
            get(reports::get_final_report),
        )
        .route(
            "/api/projects/{id}/final-report/draft",
            put(reports::save_draft),
        )
        .route(
            "/api/projects/{id}/final-report/publish",
            post(reports::publish_report),
        )
        .route(
            "/api/projects/{id}/final-report/upload",
            post(reports::upload_report),
        )
        .route(
            "/api/projects/{id}/final-report/versions",
            get(reports::list_versions),
        )
        .route(
            "/api/projects/{id}/final-report/versions/{version_id}",
            get(reports::get_version),
        )
        // Samples
        .route("/api/samples/{id}", get(samples::get_sample))
        .route(
            "/api/samples/{id}/status",
            patch(samples::update_sample_status),
        )
        .route(
            "/api/samples/{id}/analysis-report",
            get(samples::get_analysis_report).post(samples::submit_analysis_report),
        )
        .route("/api/samples/{id}/protocol", get(samples::download_protocol))
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/notifications/count",
            get(notifications::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            put(notifications::mark_all_read),
        )
        .route(
            "/api/notifications/{id}/read",
            put(notifications::mark_read),
        )
}

/// Health checks and the OpenAPI document
pub fn create_system_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/health/db", get(health::db_health_check))
        .route("/api/health/storage", get(health::storage_health_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}

/// Complete application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(create_system_routes())
        .merge(create_api_routes())
        .with_state(state)
}
