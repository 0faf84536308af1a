//! Handlers for `/admin/users` and the shared account-creation path.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use compliance_core::error::CoreError;
use compliance_core::types::DbId;
use compliance_db::models::user::{CreateUser, User, UserResponse};
use compliance_db::repositories::{ClientRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users` and `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub is_admin: bool,
    pub client_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub client_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = create_account(&state, input).await?;
    tracing::info!(user_id = user.id, created_by = admin.user_id(), "User created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/admin/users?client_id=&limit=&offset=
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool, params.client_id, page.limit(), page.offset()).await?;
    let data = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim and lowercase an email so lookups are case-insensitive.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate `input`, hash the password and insert the user.
///
/// Admins carry no tenant; client users must reference an active client.
pub async fn create_account(state: &AppState, input: CreateUserRequest) -> AppResult<User> {
    let email = normalize_email(&input.email);
    let input = CreateUserRequest { email, ..input };
    input.validate()?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    match (input.is_admin, input.client_id) {
        (true, Some(_)) => {
            return Err(AppError::Core(CoreError::Validation(
                "Admin users cannot belong to a client company".into(),
            )))
        }
        (false, None) => {
            return Err(AppError::Core(CoreError::Validation(
                "client_id is required for client users".into(),
            )))
        }
        (false, Some(client_id)) => {
            ClientRepo::find_active(&state.pool, client_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Client",
                    id: client_id,
                })?;
        }
        (true, None) => {}
    }

    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            full_name: input.full_name.trim().to_string(),
            is_admin: input.is_admin,
            client_id: input.client_id,
        },
    )
    .await?;

    Ok(user)
}
