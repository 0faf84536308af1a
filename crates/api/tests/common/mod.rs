#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use compliance_api::auth::jwt::{generate_access_token, JwtConfig};
use compliance_api::auth::password::hash_password;
use compliance_api::config::ServerConfig;
use compliance_api::router::build_app_router;
use compliance_api::state::AppState;
use compliance_db::models::client::CreateClient;
use compliance_db::models::user::{CreateUser, User};
use compliance_db::repositories::{ClientRepo, UserRepo};

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults. The upload directory is
/// replaced by a fresh temp dir when the app is built.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        upload_dir: PathBuf::from("uploads"),
        max_upload_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 30,
        },
    }
}

/// Test application plus the config it was built with. The upload root is
/// removed when the app is dropped.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    _upload_root: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_dir.clone()
    }

    /// Mint a token for `user` signed with this app's secret.
    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, &self.config.jwt).expect("token should encode")
    }
}

/// Build the full application router (same middleware stack as production).
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, mut config: ServerConfig) -> TestApp {
    let upload_root = tempfile::tempdir().expect("temp dir should be created");
    config.upload_dir = upload_root.path().join("uploads");
    let state = AppState::new(pool, config.clone());
    TestApp {
        router: build_app_router(state, &config),
        config,
        _upload_root: upload_root,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_admin(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            full_name: "Admin User".to_string(),
            is_admin: true,
            client_id: None,
        },
    )
    .await
    .expect("admin creation should succeed")
}

pub async fn create_client(pool: &PgPool, name: &str) -> i64 {
    ClientRepo::create(
        pool,
        &CreateClient {
            company_name: name.to_string(),
            industry: "Manufacturing".to_string(),
            employee_count: 25,
            point_of_contact: "Casey".to_string(),
            contact_email: format!("hr@{}.test", name.to_lowercase()),
            contact_phone: None,
            address: None,
            notes: None,
        },
    )
    .await
    .expect("client creation should succeed")
    .id
}

pub async fn create_client_user(pool: &PgPool, client_id: i64, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            full_name: "Client User".to_string(),
            is_admin: false,
            client_id: Some(client_id),
        },
    )
    .await
    .expect("client user creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a POST request with a JSON body and no authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request("POST", uri, None, body)).await
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request("POST", uri, Some(token), body)).await
}

/// Send a PUT request with a JSON body and a Bearer token.
pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request("PUT", uri, Some(token), body)).await
}

/// Send a DELETE request with a Bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

const BOUNDARY: &str = "----compliance-test-boundary";

/// Send a multipart POST with a Bearer token.
pub async fn post_multipart_auth(app: Router, uri: &str, parts: &[Part<'_>], token: &str) -> Response {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Assert a status and return the parsed JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

/// Number of entries in a directory; a missing directory counts as empty.
pub fn file_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|rd| rd.count()).unwrap_or(0)
}
