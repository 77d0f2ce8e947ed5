use crate::models::{
    AddTeamMemberRequest, AnalysisReportView, CreateSampleRequest, CreateUserRequest,
    FileDescriptor, FinalReport, MarkAllReadResult, Notification, NotificationType,
    NotificationView, Project, ProjectDetail, ProjectOverview, ProjectRequest, ProjectStatistics,
    ProjectStatus, PublishReportRequest, ReportContentRequest, ReportStatus, ReportVersion,
    ReportVersionType, Sample, SampleStatus, SubmitAnalysisReportRequest, UnreadCount,
    UpdateSampleStatusRequest, User, UserRole, UserSummary,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        crate::handlers::users::create_user,
        crate::handlers::users::current_user,
        crate::handlers::users::get_user,
        // Projects
        crate::handlers::projects::list_projects,
        crate::handlers::projects::create_project,
        crate::handlers::projects::get_project,
        crate::handlers::projects::update_project,
        crate::handlers::projects::delete_project,
        crate::handlers::projects::list_project_samples,
        crate::handlers::projects::add_sample,
        crate::handlers::projects::delete_sample,
        crate::handlers::projects::add_team_member,
        crate::handlers::projects::remove_team_member,
        crate::handlers::projects::get_statistics,
        // Final report
        crate::handlers::reports::get_final_report,
        crate::handlers::reports::save_draft,
        crate::handlers::reports::publish_report,
        crate::handlers::reports::upload_report,
        crate::handlers::reports::list_versions,
        crate::handlers::reports::get_version,
        // Samples
        crate::handlers::samples::get_sample,
        crate::handlers::samples::update_sample_status,
        crate::handlers::samples::submit_analysis_report,
        crate::handlers::samples::get_analysis_report,
        crate::handlers::samples::download_protocol,
        // Notifications
        crate::handlers::notifications::list_notifications,
        crate::handlers::notifications::unread_count,
        crate::handlers::notifications::mark_read,
        crate::handlers::notifications::mark_all_read,
        // Health
        crate::handlers::health::health_check,
        crate::handlers::health::db_health_check,
        crate::handlers::health::storage_health_check,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserSummary,
            CreateUserRequest,
            Project,
            ProjectStatus,
            ProjectRequest,
            ProjectOverview,
            ProjectDetail,
            ProjectStatistics,
            AddTeamMemberRequest,
            FinalReport,
            ReportStatus,
            ReportVersion,
            ReportVersionType,
            ReportContentRequest,
            PublishReportRequest,
            Sample,
            SampleStatus,
            FileDescriptor,
            CreateSampleRequest,
            UpdateSampleStatusRequest,
            SubmitAnalysisReportRequest,
            AnalysisReportView,
            Notification,
            NotificationType,
            NotificationView,
            UnreadCount,
            MarkAllReadResult,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Lab members and roles"),
        (name = "projects", description = "Research projects, their teams and samples"),
        (name = "reports", description = "Project final reports and their version history"),
        (name = "samples", description = "Sample lifecycle and analysis reports"),
        (name = "notifications", description = "Per-user notification inbox"),
        (name = "health", description = "Service health checks")
    ),
    info(
        title = "LabTrack API",
        version = "1.0.0",
        description = "Laboratory research management REST API"
    ),
    servers(
        (url = "http://localhost:8080", description = "Development")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by the secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_secured_paths() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["paths"]["/api/projects/{id}/final-report/publish"].is_object());
        assert!(json["paths"]["/api/notifications/read-all"].is_object());
        assert!(json["components"]["securitySchemes"]["bearer"].is_object());
    }
}
