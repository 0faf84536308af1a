//! Handlers for the client-facing `/client` resource.
//!
//! Client users are always pinned to their own tenant; any `?client_id=` they
//! send is ignored. Admins use `?client_id=` to view a tenant's portal.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use compliance_core::access::Principal;
use compliance_core::error::CoreError;
use compliance_core::inquiry::InquiryStatus;
use compliance_core::priority::Priority;
use compliance_core::task::{sort_for_client, TaskStatus};
use compliance_core::tenant::{ensure_tenant_access, resolve_client_scope};
use compliance_core::types::DbId;
use compliance_db::models::document_assignment::AssignedDocument;
use compliance_db::models::inquiry::{CreateInquiry, Inquiry, InquiryListFilter};
use compliance_db::models::task::{Task, UpcomingTask};
use compliance_db::repositories::{ClientRepo, DocumentAssignmentRepo, InquiryRepo, TaskRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{ClientScopeParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /client/inquiries`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitInquiryRequest {
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Inquiry type is required"))]
    pub inquiry_type: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Deserialize)]
pub struct PortalTaskParams {
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
pub struct PortalInquiryParams {
    pub status: Option<InquiryStatus>,
}

/// Response for `GET /client/dashboard/summary`.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub client_id: DbId,
    pub assigned_documents: i64,
    pub open_tasks: i64,
    pub open_inquiries: i64,
    pub upcoming_tasks: Vec<UpcomingTask>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/client/documents
///
/// Active documents actively assigned to the tenant.
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(scope): Query<ClientScopeParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<AssignedDocument>>>> {
    let client_id = tenant_for(&state, &auth.principal(), scope.client_id).await?;
    let documents =
        DocumentAssignmentRepo::list_for_client(&state.pool, client_id, page.limit(), page.offset())
            .await?;
    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/client/tasks
///
/// Ordered by due date (undated last), then priority, then id.
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(scope): Query<ClientScopeParams>,
    Query(params): Query<PortalTaskParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let client_id = tenant_for(&state, &auth.principal(), scope.client_id).await?;
    let mut tasks = TaskRepo::list_for_client(&state.pool, client_id, params.status).await?;
    sort_for_client(&mut tasks, |t| (t.due_date, t.priority));

    let data = tasks
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(0))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/client/inquiries
///
/// New inquiries always start `open`.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(scope): Query<ClientScopeParams>,
    Json(input): Json<SubmitInquiryRequest>,
) -> AppResult<(StatusCode, Json<Inquiry>)> {
    input.validate()?;
    let client_id = tenant_for(&state, &auth.principal(), scope.client_id).await?;

    let inquiry = InquiryRepo::create(
        &state.pool,
        &CreateInquiry {
            subject: input.subject.trim().to_string(),
            description: input.description,
            inquiry_type: input.inquiry_type,
            priority: input.priority,
            client_id,
            submitted_by: auth.user_id(),
        },
    )
    .await?;

    tracing::info!(
        inquiry_id = inquiry.id,
        client_id,
        submitted_by = auth.user_id(),
        "Inquiry submitted",
    );
    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// GET /api/client/inquiries
pub async fn list_inquiries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(scope): Query<ClientScopeParams>,
    Query(params): Query<PortalInquiryParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Inquiry>>>> {
    let client_id = tenant_for(&state, &auth.principal(), scope.client_id).await?;
    let filter = InquiryListFilter {
        client_id: Some(client_id),
        status: params.status,
        limit: page.limit(),
        offset: page.offset(),
    };
    let inquiries = InquiryRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// GET /api/client/inquiries/{id}
///
/// Another tenant's inquiry is 403, not 404.
pub async fn get_inquiry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Inquiry>> {
    let inquiry = InquiryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Inquiry",
            id,
        })?;
    ensure_tenant_access(&auth.principal(), inquiry.client_id)?;
    Ok(Json(inquiry))
}

/// GET /api/client/dashboard/summary
pub async fn dashboard_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(scope): Query<ClientScopeParams>,
) -> AppResult<Json<DashboardSummary>> {
    let client_id = tenant_for(&state, &auth.principal(), scope.client_id).await?;

    let (assigned_documents, open_tasks, open_inquiries, upcoming_tasks) = tokio::try_join!(
        DocumentAssignmentRepo::count_active_for_client(&state.pool, client_id),
        TaskRepo::count_open_for_client(&state.pool, client_id),
        InquiryRepo::count_open_for_client(&state.pool, client_id),
        TaskRepo::upcoming_for_client(&state.pool, client_id),
    )?;

    Ok(Json(DashboardSummary {
        client_id,
        assigned_documents,
        open_tasks,
        open_inquiries,
        upcoming_tasks,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the tenant for a portal request. An admin-selected tenant must
/// exist and be active.
async fn tenant_for(
    state: &AppState,
    principal: &Principal,
    requested: Option<DbId>,
) -> AppResult<DbId> {
    let client_id = resolve_client_scope(principal, requested)?;
    if principal.is_admin {
        ClientRepo::find_active(&state.pool, client_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Client",
                id: client_id,
            })?;
    }
    Ok(client_id)
}
