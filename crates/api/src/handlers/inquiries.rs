//! Handlers for the admin side of `/admin/inquiries`.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use compliance_core::error::CoreError;
use compliance_core::inquiry::{
    resolution_stamp, validate_transition, InquiryStatus, DEFAULT_RESPONSE_STATUS,
};
use compliance_core::tenant::resolve_admin_scope;
use compliance_core::types::DbId;
use compliance_db::models::inquiry::{Inquiry, InquiryListFilter, InquiryResponse};
use compliance_db::repositories::InquiryRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{AdminScopeParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/inquiries/{id}/respond`.
#[derive(Debug, Deserialize, Validate)]
pub struct RespondRequest {
    #[validate(length(min = 1, message = "Response text is required"))]
    pub admin_response: String,
    /// Target status; defaults to `in_review`.
    pub status: Option<InquiryStatus>,
    pub resolution_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InquiryStatusParams {
    pub status: Option<InquiryStatus>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/inquiries?client_id=&all_clients=&status=&limit=&offset=
pub async fn list_inquiries(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(scope): Query<AdminScopeParams>,
    Query(params): Query<InquiryStatusParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Inquiry>>>> {
    let scope = resolve_admin_scope(scope.client_id, scope.all_clients)?;
    let filter = InquiryListFilter {
        client_id: scope.client_id(),
        status: params.status,
        limit: page.limit(),
        offset: page.offset(),
    };
    let inquiries = InquiryRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// PUT /api/admin/inquiries/{id}/respond
pub async fn respond_to_inquiry(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<Inquiry>> {
    input.validate()?;
    let current = InquiryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Inquiry",
            id,
        })?;

    let next = input.status.unwrap_or(DEFAULT_RESPONSE_STATUS);
    validate_transition(current.status, next)?;

    let response = InquiryResponse {
        admin_response: input.admin_response,
        status: next,
        resolution_notes: input.resolution_notes,
        resolved_at: resolution_stamp(next, current.resolved_at, Utc::now()),
        responder_id: admin.user_id(),
    };

    let updated = InquiryRepo::respond(&state.pool, id, current.status, &response)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Inquiry was modified by another request".into(),
            ))
        })?;

    tracing::info!(
        inquiry_id = id,
        from = %current.status,
        to = %updated.status,
        responder_id = admin.user_id(),
        "Inquiry responded",
    );
    Ok(Json(updated))
}
