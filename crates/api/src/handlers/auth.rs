//! Handlers for the `/auth` resource (login, register, me, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use compliance_core::error::CoreError;
use compliance_db::models::user::UserResponse;
use compliance_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::users::{create_account, normalize_email, CreateUserRequest};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns a bearer access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login: bad password");
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, is_admin = user.is_admin, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(&user),
    }))
}

/// POST /api/auth/register
///
/// Admin-only account creation; same rules as `POST /admin/users`.
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = create_account(&state, input).await?;
    tracing::info!(user_id = user.id, created_by = admin.user_id(), "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&auth.user))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so there is nothing to revoke. Returns 204 No Content.
pub async fn logout(RequireAuth(auth): RequireAuth) -> StatusCode {
    tracing::debug!(user_id = auth.user_id(), "User logged out");
    StatusCode::NO_CONTENT
}
