//! Handlers for the `/admin/clients` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use compliance_core::error::CoreError;
use compliance_core::types::DbId;
use compliance_db::models::client::{Client, ClientListFilter, CreateClient, UpdateClient};
use compliance_db::repositories::ClientRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/clients`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Industry is required"))]
    pub industry: String,
    #[validate(range(min = 0, message = "Employee count cannot be negative"))]
    pub employee_count: i32,
    #[validate(length(min = 1, message = "Point of contact is required"))]
    pub point_of_contact: String,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateClientRequest> for CreateClient {
    fn from(req: CreateClientRequest) -> Self {
        CreateClient {
            company_name: req.company_name.trim().to_string(),
            industry: req.industry.trim().to_string(),
            employee_count: req.employee_count,
            point_of_contact: req.point_of_contact.trim().to_string(),
            contact_email: req.contact_email.trim().to_lowercase(),
            contact_phone: req.contact_phone,
            address: req.address,
            notes: req.notes,
        }
    }
}

/// Request body for `PUT /admin/clients/{id}`. Omitted fields are unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, message = "Company name cannot be empty"))]
    pub company_name: Option<String>,
    pub industry: Option<String>,
    #[validate(range(min = 0, message = "Employee count cannot be negative"))]
    pub employee_count: Option<i32>,
    pub point_of_contact: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateClientRequest> for UpdateClient {
    fn from(req: UpdateClientRequest) -> Self {
        UpdateClient {
            company_name: req.company_name,
            industry: req.industry,
            employee_count: req.employee_count,
            point_of_contact: req.point_of_contact,
            contact_email: req.contact_email.map(|e| e.trim().to_lowercase()),
            contact_phone: req.contact_phone,
            address: req.address,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClientListParams {
    pub industry: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/clients
pub async fn create_client(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateClientRequest>,
) -> AppResult<(StatusCode, Json<Client>)> {
    input.validate()?;
    let client = ClientRepo::create(&state.pool, &input.into()).await?;
    tracing::info!(client_id = client.id, created_by = admin.user_id(), "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/admin/clients?industry=&include_inactive=&limit=&offset=
pub async fn list_clients(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ClientListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let filter = ClientListFilter {
        industry: params.industry,
        include_inactive: params.include_inactive,
        limit: page.limit(),
        offset: page.offset(),
    };
    let clients = ClientRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/admin/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(client))
}

/// PUT /api/admin/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClientRequest>,
) -> AppResult<Json<Client>> {
    input.validate()?;
    let client = ClientRepo::update(&state.pool, id, &input.into())
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(client))
}

/// DELETE /api/admin/clients/{id}
///
/// Soft-deactivates the client. Its users, tasks and assignments are kept.
pub async fn deactivate_client(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ClientRepo::deactivate(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(client_id = id, deactivated_by = admin.user_id(), "Client deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Client", id })
}
