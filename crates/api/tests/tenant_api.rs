//! HTTP-level integration tests for tenant scoping, assignments, tasks,
//! inquiries and the client dashboard.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, build_test_app, create_admin, create_client, create_client_user, delete_auth,
    expect_json, get_auth, post_json_auth, put_json_auth, TestApp,
};
use axum::response::IntoResponse;
use compliance_api::error::AppError;
use compliance_db::models::document::CreateDocument;
use compliance_db::models::task::CreateTask;
use compliance_db::repositories::{DocumentRepo, TaskRepo, UserRepo};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn seed_document(pool: &PgPool, uploaded_by: i64, name: &str) -> i64 {
    DocumentRepo::create(
        pool,
        &CreateDocument {
            filename: format!("{name}.pdf"),
            original_filename: format!("{name}.pdf"),
            file_path: format!("/nonexistent/{name}.pdf"),
            file_size: 10,
            mime_type: "application/pdf".to_string(),
            description: None,
            document_type: "policy".to_string(),
            uploaded_by,
        },
    )
    .await
    .unwrap()
    .id
}

async fn create_task(app: &TestApp, token: &str, client_id: i64, title: &str, extra: Value) -> Value {
    let mut body = json!({ "title": title, "task_type": "filing", "client_id": client_id });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
    }
    expect_json(
        post_json_auth(app.router(), "/api/admin/tasks", body, token).await,
        StatusCode::CREATED,
    )
    .await
}

async fn submit_inquiry(app: &TestApp, token: &str, subject: &str) -> Value {
    let body = json!({
        "subject": subject,
        "description": "How many PTO days carry over?",
        "inquiry_type": "policy",
        "priority": "high",
    });
    expect_json(
        post_json_auth(app.router(), "/api/client/inquiries", body, token).await,
        StatusCode::CREATED,
    )
    .await
}

fn titles(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_lifecycle(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    let body = json!({
        "company_name": "Initech",
        "industry": "Software",
        "employee_count": 120,
        "point_of_contact": "Bill",
        "contact_email": "hr@initech.test",
    });
    let created = expect_json(
        post_json_auth(app.router(), "/api/admin/clients", body, &token).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let updated = expect_json(
        put_json_auth(
            app.router(),
            &format!("/api/admin/clients/{id}"),
            json!({ "employee_count": 130 }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["employee_count"], 130);
    assert_eq!(updated["company_name"], "Initech");

    let response = delete_auth(app.router(), &format!("/api/admin/clients/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get_auth(app.router(), "/api/admin/clients", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let json = body_json(
        get_auth(app.router(), "/api/admin/clients?include_inactive=true", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_outcomes(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let doc = seed_document(&pool, admin.id, "handbook").await;
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    let body = json!({ "document_id": doc, "client_id": acme, "notes": "Annual refresh" });
    let json = expect_json(
        post_json_auth(app.router(), "/api/admin/documents/assign", body.clone(), &token).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(json["assigned_by"], admin.id);
    assert_eq!(json["notes"], "Annual refresh");

    let json = expect_json(
        post_json_auth(app.router(), "/api/admin/documents/assign", body, &token).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "CONFLICT");

    let body = json!({ "document_id": 9999, "client_id": acme });
    let response = post_json_auth(app.router(), "/api/admin/documents/assign", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json!({ "document_id": doc, "client_id": 9999 });
    let response = post_json_auth(app.router(), "/api/admin/documents/assign", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assignment_list_scope(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let globex = create_client(&pool, "Globex").await;
    let doc = seed_document(&pool, admin.id, "handbook").await;
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    for client in [acme, globex] {
        let body = json!({ "document_id": doc, "client_id": client });
        let response = post_json_auth(app.router(), "/api/admin/documents/assign", body, &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = expect_json(
        get_auth(app.router(), "/api/admin/documents/assignments", &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "MISSING_TENANT_CONTEXT");

    let uri = format!("/api/admin/documents/assignments?client_id={acme}");
    let json = body_json(get_auth(app.router(), &uri, &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/admin/documents/assignments?document_id={doc}");
    let json = body_json(get_auth(app.router(), &uri, &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(
        get_auth(app.router(), "/api/admin/documents/assignments?all_clients=true", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Tenant scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_lists_need_tenant(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    create_task(&app, &token, acme, "Post labor law poster", json!({})).await;

    for uri in ["/api/admin/tasks", "/api/admin/inquiries", "/api/client/tasks"] {
        let json = expect_json(get_auth(app.router(), uri, &token).await, StatusCode::BAD_REQUEST).await;
        assert_eq!(json["code"], "MISSING_TENANT_CONTEXT", "{uri}");
    }

    let json = body_json(get_auth(app.router(), "/api/admin/tasks?all_clients=true", &token).await).await;
    assert_eq!(titles(&json), ["Post labor law poster"]);

    let uri = format!("/api/client/tasks?client_id={acme}");
    let json = body_json(get_auth(app.router(), &uri, &token).await).await;
    assert_eq!(titles(&json), ["Post labor law poster"]);

    let response = get_auth(app.router(), "/api/client/tasks?client_id=9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A client user only ever sees their own tenant, whatever they ask for.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_user_pinned_to_tenant(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let globex = create_client(&pool, "Globex").await;
    let acme_user = create_client_user(&pool, acme, "jo@acme.test").await;
    let globex_user = create_client_user(&pool, globex, "al@globex.test").await;
    let app = build_test_app(pool);
    let admin_token = app.token_for(&admin);
    let acme_token = app.token_for(&acme_user);

    create_task(&app, &admin_token, acme, "Acme task", json!({})).await;
    create_task(&app, &admin_token, globex, "Globex task", json!({})).await;
    submit_inquiry(&app, &app.token_for(&globex_user), "Globex question").await;

    let uri = format!("/api/client/tasks?client_id={globex}");
    let json = body_json(get_auth(app.router(), &uri, &acme_token).await).await;
    assert_eq!(titles(&json), ["Acme task"]);

    let uri = format!("/api/client/inquiries?client_id={globex}");
    let json = body_json(get_auth(app.router(), &uri, &acme_token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // Client users cannot reach admin endpoints at all.
    let response = get_auth(app.router(), "/api/admin/tasks?all_clients=true", &acme_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_task_order(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let member = create_client_user(&pool, acme, "jo@acme.test").await;
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    let later = (Utc::now() + Duration::days(10)).to_rfc3339();
    let sooner = (Utc::now() + Duration::days(5)).to_rfc3339();

    create_task(&app, &token, acme, "Undated", json!({ "priority": "urgent" })).await;
    create_task(&app, &token, acme, "A", json!({ "due_date": later, "priority": "low" })).await;
    create_task(&app, &token, acme, "B", json!({ "due_date": later, "priority": "urgent" })).await;
    create_task(&app, &token, acme, "C", json!({ "due_date": sooner, "priority": "medium" })).await;

    let json = body_json(get_auth(app.router(), "/api/client/tasks", &app.token_for(&member)).await).await;
    assert_eq!(titles(&json), ["C", "B", "A", "Undated"]);

    let json = body_json(
        get_auth(app.router(), "/api/client/tasks?limit=2&offset=1", &app.token_for(&member)).await,
    )
    .await;
    assert_eq!(titles(&json), ["B", "A"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_transitions(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    let task = create_task(&app, &token, acme, "I-9 audit", json!({})).await;
    assert_eq!(task["status"], "pending");
    assert_eq!(task["priority"], "medium");
    let uri = format!("/api/admin/tasks/{}", task["id"]);

    let json = expect_json(
        put_json_auth(app.router(), &uri, json!({ "status": "completed" }), &token).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "CONFLICT");

    let json = expect_json(
        put_json_auth(app.router(), &uri, json!({ "status": "in_progress" }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert!(json["completed_date"].is_null());

    let json = expect_json(
        put_json_auth(app.router(), &uri, json!({ "status": "completed" }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["status"], "completed");
    assert!(json["completed_date"].is_string());

    let response = put_json_auth(app.router(), &uri, json!({ "status": "pending" }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(app.router(), &uri, json!({ "status": "finished" }), &token).await;
    assert!(response.status().is_client_error());

    let response = put_json_auth(app.router(), "/api/admin/tasks/9999", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_for_missing_client(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let app = build_test_app(pool);

    let body = json!({ "title": "Orphan", "task_type": "filing", "client_id": 9999 });
    let response = post_json_auth(app.router(), "/api/admin/tasks", body, &app.token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_assignee_checks(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let globex = create_client(&pool, "Globex").await;
    let member = create_client_user(&pool, acme, "jo@acme.test").await;
    let outsider = create_client_user(&pool, globex, "sam@globex.test").await;
    let departed = create_client_user(&pool, acme, "old@acme.test").await;
    UserRepo::deactivate(&pool, departed.id).await.unwrap();
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    let post = |assignee: i64| {
        let body = json!({
            "title": "Review I-9s",
            "task_type": "audit",
            "client_id": acme,
            "assigned_to": assignee,
        });
        post_json_auth(app.router(), "/api/admin/tasks", body, &token)
    };

    assert_eq!(post(424_242).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(post(departed.id).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(post(outsider.id).await.status(), StatusCode::BAD_REQUEST);

    let task = expect_json(post(member.id).await, StatusCode::CREATED).await;
    assert_eq!(task["assigned_to"], member.id);
    let task = expect_json(post(admin.id).await, StatusCode::CREATED).await;
    assert_eq!(task["assigned_to"], admin.id);

    // Reassignment goes through the same checks and leaves the task untouched.
    let uri = format!("/api/admin/tasks/{}", task["id"]);
    for (assignee, status) in [
        (424_242, StatusCode::NOT_FOUND),
        (outsider.id, StatusCode::BAD_REQUEST),
    ] {
        let body = json!({ "assigned_to": assignee });
        let response = put_json_auth(app.router(), &uri, body, &token).await;
        assert_eq!(response.status(), status);
    }
    let current = expect_json(get_auth(app.router(), &uri, &token).await, StatusCode::OK).await;
    assert_eq!(current["assigned_to"], admin.id);

    let body = json!({ "assigned_to": member.id });
    let updated = expect_json(put_json_auth(app.router(), &uri, body, &token).await, StatusCode::OK).await;
    assert_eq!(updated["assigned_to"], member.id);
}

/// A dangling reference that reaches the database is a client error, not a 500.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_key_violation_is_bad_request(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;

    let err = TaskRepo::create(
        &pool,
        &CreateTask {
            title: "Dangling".to_string(),
            description: None,
            task_type: "filing".to_string(),
            priority: Default::default(),
            due_date: None,
            client_id: acme,
            created_by: admin.id,
            assigned_to: Some(424_242),
        },
    )
    .await
    .unwrap_err();

    let response = AppError::from(err).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inquiry_flow(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let member = create_client_user(&pool, acme, "jo@acme.test").await;
    let app = build_test_app(pool);
    let admin_token = app.token_for(&admin);

    let inquiry = submit_inquiry(&app, &app.token_for(&member), "PTO carry-over").await;
    assert_eq!(inquiry["status"], "open");
    assert_eq!(inquiry["client_id"], acme);
    assert_eq!(inquiry["submitted_by"], member.id);
    let respond = format!("/api/admin/inquiries/{}/respond", inquiry["id"]);

    let json = expect_json(
        put_json_auth(
            app.router(),
            &respond,
            json!({ "admin_response": "Looking into it" }),
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["status"], "in_review");
    assert_eq!(json["assigned_to"], admin.id);
    assert!(json["resolved_at"].is_null());

    let json = expect_json(
        put_json_auth(
            app.router(),
            &respond,
            json!({ "admin_response": "Five days", "status": "closed", "resolution_notes": "Per handbook" }),
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["status"], "closed");
    assert_eq!(json["resolution_notes"], "Per handbook");
    assert!(json["resolved_at"].is_string());

    let response = put_json_auth(
        app.router(),
        &respond,
        json!({ "admin_response": "Reopening", "status": "in_review" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let uri = format!("/api/admin/inquiries?client_id={acme}&status=closed");
    let json = body_json(get_auth(app.router(), &uri, &admin_token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inquiry_validation(pool: PgPool) {
    let acme = create_client(&pool, "Acme").await;
    let member = create_client_user(&pool, acme, "jo@acme.test").await;
    let app = build_test_app(pool);

    let body = json!({ "subject": "", "description": "x", "inquiry_type": "policy" });
    let json = expect_json(
        post_json_auth(app.router(), "/api/client/inquiries", body, &app.token_for(&member)).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inquiry_detail_is_tenant_scoped(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let globex = create_client(&pool, "Globex").await;
    let acme_user = create_client_user(&pool, acme, "jo@acme.test").await;
    let globex_user = create_client_user(&pool, globex, "al@globex.test").await;
    let app = build_test_app(pool);

    let inquiry = submit_inquiry(&app, &app.token_for(&acme_user), "Overtime rules").await;
    let uri = format!("/api/client/inquiries/{}", inquiry["id"]);

    let response = get_auth(app.router(), &uri, &app.token_for(&acme_user)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = expect_json(
        get_auth(app.router(), &uri, &app.token_for(&globex_user)).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(json["code"], "FORBIDDEN");

    let response = get_auth(app.router(), &uri, &app.token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.router(), "/api/client/inquiries/9999", &app.token_for(&acme_user)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_summary(pool: PgPool) {
    let admin = create_admin(&pool, "admin@hr.test").await;
    let acme = create_client(&pool, "Acme").await;
    let globex = create_client(&pool, "Globex").await;
    let member = create_client_user(&pool, acme, "jo@acme.test").await;
    let doc = seed_document(&pool, admin.id, "handbook").await;
    let app = build_test_app(pool);
    let admin_token = app.token_for(&admin);
    let member_token = app.token_for(&member);

    let body = json!({ "document_id": doc, "client_id": acme });
    post_json_auth(app.router(), "/api/admin/documents/assign", body, &admin_token).await;

    let soon = (Utc::now() + Duration::days(3)).to_rfc3339();
    let far = (Utc::now() + Duration::days(30)).to_rfc3339();
    create_task(&app, &admin_token, acme, "Due soon", json!({ "due_date": soon })).await;
    create_task(&app, &admin_token, acme, "Due later", json!({ "due_date": far })).await;
    let done = create_task(&app, &admin_token, acme, "Done", json!({ "due_date": soon })).await;
    create_task(&app, &admin_token, globex, "Other tenant", json!({ "due_date": soon })).await;

    let uri = format!("/api/admin/tasks/{}", done["id"]);
    put_json_auth(app.router(), &uri, json!({ "status": "cancelled" }), &admin_token).await;

    submit_inquiry(&app, &member_token, "Open question").await;

    let json = expect_json(
        get_auth(app.router(), "/api/client/dashboard/summary", &member_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["client_id"], acme);
    assert_eq!(json["assigned_documents"], 1);
    assert_eq!(json["open_tasks"], 2);
    assert_eq!(json["open_inquiries"], 1);

    let upcoming = json["upcoming_tasks"].as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["title"], "Due soon");
}
