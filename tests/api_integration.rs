//! HTTP integration tests for the LabTrack REST API.
//!
//! Each test builds a fresh router over the in-memory store and a temporary
//! upload directory, then drives it with `tower::ServiceExt::oneshot`
//! without opening a socket.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{TestApp, multipart_body};
use labtrack_backend::models::UserRole;
use serde_json::{Value, json};
use uuid::Uuid;

fn project_body(name: &str, lead: Uuid, members: &[Uuid]) -> Value {
    json!({
        "projectName": name,
        "researchDomain": "Microbiology",
        "teamLead": lead,
        "teamMembers": members,
        "startDate": "2025-01-06T00:00:00Z",
        "deadline": "2025-06-30T00:00:00Z",
        "description": "Survey of soil bacteria",
    })
}

async fn create_project(app: &TestApp, token: &str, name: &str, lead: Uuid) -> Uuid {
    let (status, json) = app
        .json("POST", "/api/projects", token, project_body(name, lead, &[]))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_str().unwrap().parse().unwrap()
}

async fn add_sample(app: &TestApp, token: &str, project: Uuid, identification: &str) -> Uuid {
    let data = json!({"name": "Topsoil core", "identification": identification});
    let body = multipart_body(&[("sampleData", data.to_string())], None);
    let (status, json) = app
        .multipart(&format!("/api/projects/{project}/samples"), token, body)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_str().unwrap().parse().unwrap()
}

async fn unread(app: &TestApp, token: &str) -> i64 {
    let (status, json) = app.get("/api/notifications/count", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    json["data"]["count"].as_i64().unwrap()
}

// == Authentication ==========================================================

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = TestApp::new().await;

    let (status, json) = app.get("/api/projects", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["msg"], "Authentication required");

    let (status, _) = app.get("/api/projects", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;

    let (status, json) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");

    let (status, json) = app.get("/api/health/db", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["database"], "memory");
}

#[tokio::test]
async fn current_user_is_resolved_from_token() {
    let app = TestApp::new().await;
    let (user, token) = app.user("Ada", UserRole::Researcher).await;

    let (status, json) = app.get("/api/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], user.id.to_string());
    assert_eq!(json["data"]["role"], "researcher");
}

#[tokio::test]
async fn only_admins_create_users() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("Root", UserRole::Admin).await;
    let (_, researcher) = app.user("Ada", UserRole::Researcher).await;
    let body = json!({"name": "Grace", "email": "Grace@Lab.test", "role": "technician"});

    let (status, _) = app.json("POST", "/api/users", &researcher, body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app.json("POST", "/api/users", &admin, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["email"], "grace@lab.test");

    let (status, json) = app.json("POST", "/api/users", &admin, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "User already exists");
}

// == Projects ================================================================

#[tokio::test]
async fn create_project_rejects_duplicate_names() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;

    let (status, json) = app
        .json(
            "POST",
            "/api/projects",
            &token,
            project_body("Soil", creator.id, &[]),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "Planning");
    assert_eq!(json["data"]["createdBy"], creator.id.to_string());

    let (status, json) = app
        .json(
            "POST",
            "/api/projects",
            &token,
            project_body("Soil", creator.id, &[]),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Project already exists");
}

#[tokio::test]
async fn create_project_lists_missing_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.user("Ada", UserRole::Researcher).await;

    let (status, json) = app
        .json("POST", "/api/projects", &token, json!({"projectName": "Soil"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["msg"].as_str().unwrap().contains("researchDomain"));
}

#[tokio::test]
async fn technicians_cannot_create_projects() {
    let app = TestApp::new().await;
    let (tech, token) = app.user("Tom", UserRole::Technician).await;

    let (status, json) = app
        .json(
            "POST",
            "/api/projects",
            &token,
            project_body("Soil", tech.id, &[]),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], 403);
}

#[tokio::test]
async fn only_the_creator_deletes_a_project() {
    let app = TestApp::new().await;
    let (creator, owner) = app.user("Ada", UserRole::Researcher).await;
    let (_, other) = app.user("Bob", UserRole::Researcher).await;
    let project = create_project(&app, &owner, "Soil", creator.id).await;

    let (status, _) = app.delete(&format!("/api/projects/{project}"), &other).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&format!("/api/projects/{project}"), &owner).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/projects/{project}"), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_creation_notifies_the_team() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let (member, member_token) = app.user("Bob", UserRole::Researcher).await;

    let (status, _) = app
        .json(
            "POST",
            "/api/projects",
            &token,
            project_body("Soil", creator.id, &[member.id]),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = app.get("/api/notifications", Some(&member_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["title"], "Added to Project");
    assert_eq!(json["data"][0]["projectName"], "Soil");
    assert_eq!(unread(&app, &token).await, 1);
}

#[tokio::test]
async fn team_members_are_added_and_removed() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let (member, member_token) = app.user("Bob", UserRole::Technician).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    let team = format!("/api/projects/{project}/team");

    let (status, json) = app
        .json("POST", &team, &token, json!({"userId": member.id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["teamMembers"][0], member.id.to_string());

    let (status, json) = app
        .json("POST", &team, &token, json!({"userId": member.id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "User is already a team member");

    let (status, _) = app.delete(&format!("{team}/{}", member.id), &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.delete(&format!("{team}/{}", member.id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "Member not found in project");

    let (_, json) = app.get("/api/notifications", Some(&member_token)).await;
    assert_eq!(json["data"][0]["title"], "Removed from Project");
}

// == Samples =================================================================

#[tokio::test]
async fn sample_upload_stores_the_protocol_file() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;

    let data = json!({"name": "Topsoil core", "identification": "S-001"});
    let body = multipart_body(
        &[("sampleData", data.to_string())],
        Some(("file", "protocol.txt", b"Keep at 4C")),
    );
    let (status, json) = app
        .multipart(&format!("/api/projects/{project}/samples"), &token, body)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["status"], "Pending");
    let sample = json["data"]["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri(format!("/api/samples/{sample}/protocol"))
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = app.raw(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"Keep at 4C");
}

#[tokio::test]
async fn protocol_download_names_a_sanitized_file() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;

    let data = json!({"name": "Topsoil core", "identification": "S-001"});
    let body = multipart_body(
        &[("sampleData", data.to_string())],
        Some(("file", "protocol v2 (final).txt", b"Keep at 4C")),
    );
    let (status, json) = app
        .multipart(&format!("/api/projects/{project}/samples"), &token, body)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    let sample = json["data"]["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri(format!("/api/samples/{sample}/protocol"))
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = app.raw_with_headers(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers["content-disposition"],
        "attachment; filename=\"protocol_v2__final_.txt\""
    );
}

#[tokio::test]
async fn sample_identification_is_unique() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    add_sample(&app, &token, project, "S-001").await;

    let data = json!({"name": "Second core", "identification": "S-001"});
    let body = multipart_body(&[("sampleData", data.to_string())], None);
    let (status, json) = app
        .multipart(&format!("/api/projects/{project}/samples"), &token, body)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Sample identification already exists");
}

#[tokio::test]
async fn sample_status_moves_forward_only() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let (_, tech) = app.user("Tom", UserRole::Technician).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    let sample = add_sample(&app, &token, project, "S-001").await;
    let status_uri = format!("/api/samples/{sample}/status");

    let (status, json) = app
        .json("PATCH", &status_uri, &tech, json!({"status": "Lost"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Invalid status provided");

    let (status, json) = app
        .json("PATCH", &status_uri, &tech, json!({"status": "In Analysis"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "In Analysis");

    let (_, json) = app
        .get(&format!("/api/projects/{project}"), Some(&token))
        .await;
    assert_eq!(json["data"]["status"], "Active");

    let (status, json) = app
        .json("PATCH", &status_uri, &tech, json!({"status": "In Analysis"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Sample already in this status");
}

#[tokio::test]
async fn analysis_report_completes_the_sample() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let (_, tech) = app.user("Tom", UserRole::Technician).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    let sample = add_sample(&app, &token, project, "S-001").await;
    let report_uri = format!("/api/samples/{sample}/analysis-report");

    let (status, _) = app
        .json("POST", &report_uri, &tech, json!({"analysisReport": "Too early"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json(
            "PATCH",
            &format!("/api/samples/{sample}/status"),
            &tech,
            json!({"status": "In Analysis"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .json("POST", &report_uri, &tech, json!({"analysisReport": "  "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Analysis report is required");

    let (status, json) = app
        .json(
            "POST",
            &report_uri,
            &tech,
            json!({"analysisReport": "High nitrogen content"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["status"], "Analyzed");

    let (status, json) = app.get(&report_uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["analysisReport"], "High nitrogen content");

    let (_, json) = app.get("/api/projects", Some(&token)).await;
    assert_eq!(json["data"][0]["progress"], 100);
}

// == Final report ============================================================

#[tokio::test]
async fn draft_then_publish_final_report() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    let base = format!("/api/projects/{project}/final-report");

    let (status, json) = app.get(&base, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].is_null());

    let (status, json) = app
        .json("PUT", &format!("{base}/draft"), &token, json!({"content": "Findings"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "draft");

    let (status, json) = app
        .json("POST", &format!("{base}/publish"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["content"], "Findings");

    let (_, json) = app.get(&format!("{base}/versions"), Some(&token)).await;
    let versions = json["data"].as_array().unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0]["type"], "manual");
}

#[tokio::test]
async fn publish_accepts_a_bodyless_post() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    let base = format!("/api/projects/{project}/final-report");

    let (status, _) = app
        .json("PUT", &format!("{base}/draft"), &token, json!({"content": "Findings"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.post_empty(&format!("{base}/publish"), &token).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["content"], "Findings");
}

#[tokio::test]
async fn uploaded_report_becomes_a_version() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    let base = format!("/api/projects/{project}/final-report");

    let body = multipart_body(&[], Some(("file", "report.txt", b"Uploaded findings")));
    let (status, json) = app.multipart(&format!("{base}/upload"), &token, body).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["content"], "Uploaded findings");

    let (_, json) = app.get(&format!("{base}/versions"), Some(&token)).await;
    let version = &json["data"][0];
    assert_eq!(version["type"], "upload");
    assert_eq!(version["fileName"], "report.txt");

    let (status, json) = app
        .get(
            &format!("{base}/versions/{}", version["id"].as_str().unwrap()),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["content"], "Uploaded findings");
}

// == Notifications ===========================================================

#[tokio::test]
async fn mark_all_read_is_idempotent() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    add_sample(&app, &token, project, "S-001").await;
    assert_eq!(unread(&app, &token).await, 2);

    let (status, json) = app
        .json("PUT", "/api/notifications/read-all", &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["modified"], 2);

    let (_, json) = app
        .json("PUT", "/api/notifications/read-all", &token, json!({}))
        .await;
    assert_eq!(json["data"]["modified"], 0);
    assert_eq!(unread(&app, &token).await, 0);
}

#[tokio::test]
async fn notifications_of_other_users_cannot_be_marked() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let (_, other) = app.user("Bob", UserRole::Researcher).await;
    create_project(&app, &token, "Soil", creator.id).await;

    let (_, json) = app.get("/api/notifications", Some(&token)).await;
    let id = json["data"][0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/notifications/{id}/read");

    let (status, _) = app.json("PUT", &uri, &other, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app.json("PUT", &uri, &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["isRead"], true);
}

#[tokio::test]
async fn statistics_count_every_status() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;

    let mut funded = project_body("Soil", creator.id, &[]);
    funded["budget"] = json!(1500.5);
    let (status, json) = app.json("POST", "/api/projects", &token, funded).await;
    assert_eq!(status, StatusCode::CREATED);
    let soil: Uuid = json["data"]["id"].as_str().unwrap().parse().unwrap();
    let mut paused = project_body("Barley", creator.id, &[]);
    paused["status"] = json!("On Hold");
    let (status, _) = app.json("POST", "/api/projects", &token, paused).await;
    assert_eq!(status, StatusCode::CREATED);
    add_sample(&app, &token, soil, "S-001").await;
    add_sample(&app, &token, soil, "S-002").await;

    let (status, json) = app.get("/api/statistics", Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    let stats = &json["data"];
    assert_eq!(stats["totalProjects"], 2);
    assert_eq!(stats["totalBudget"], 1500.5);
    assert_eq!(stats["totalSamples"], 2);
    assert_eq!(
        stats["statusCounts"],
        json!({
            "Planning": 1,
            "Active": 0,
            "Completed": 0,
            "On Hold": 1,
            "Cancelled": 0,
        })
    );
}

#[tokio::test]
async fn notifications_name_the_related_sample() {
    let app = TestApp::new().await;
    let (creator, token) = app.user("Ada", UserRole::Researcher).await;
    let project = create_project(&app, &token, "Soil", creator.id).await;
    add_sample(&app, &token, project, "S-001").await;

    let (status, json) = app.get("/api/notifications", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let latest = &json["data"][0];
    assert_eq!(latest["title"], "Sample Added");
    assert_eq!(latest["projectName"], "Soil");
    assert_eq!(latest["sampleName"], "Topsoil core");
    assert!(json["data"][1]["sampleName"].is_null());
}
