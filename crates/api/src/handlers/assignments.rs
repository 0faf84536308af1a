//! Handlers for `/admin/documents/assign` and `/admin/documents/assignments`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use compliance_core::error::CoreError;
use compliance_core::tenant::resolve_admin_scope;
use compliance_core::types::DbId;
use compliance_db::models::document_assignment::{
    AssignOutcome, AssignmentListFilter, CreateDocumentAssignment, DocumentAssignment,
};
use compliance_db::repositories::DocumentAssignmentRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/documents/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignDocumentRequest {
    pub document_id: DbId,
    pub client_id: DbId,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentListParams {
    pub client_id: Option<DbId>,
    pub document_id: Option<DbId>,
    #[serde(default)]
    pub all_clients: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/documents/assign
///
/// 201 on a new assignment, 404 for a missing document or client, 409 when
/// the pair is already actively assigned.
pub async fn assign_document(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<AssignDocumentRequest>,
) -> AppResult<(StatusCode, Json<DocumentAssignment>)> {
    let create = CreateDocumentAssignment {
        document_id: input.document_id,
        client_id: input.client_id,
        assigned_by: admin.user_id(),
        notes: input.notes,
    };

    match DocumentAssignmentRepo::assign(&state.pool, &create).await? {
        AssignOutcome::Created(assignment) => {
            tracing::info!(
                assignment_id = assignment.id,
                document_id = assignment.document_id,
                client_id = assignment.client_id,
                assigned_by = assignment.assigned_by,
                "Document assigned",
            );
            Ok((StatusCode::CREATED, Json(assignment)))
        }
        AssignOutcome::DocumentNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id: input.document_id,
        })),
        AssignOutcome::ClientNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        })),
        AssignOutcome::Duplicate => Err(AppError::Core(CoreError::Conflict(
            "Document is already assigned to this client".into(),
        ))),
    }
}

/// GET /api/admin/documents/assignments?client_id=&document_id=&all_clients=
///
/// Filtering by document alone spans every tenant; otherwise a tenant or the
/// `all_clients` opt-in is required.
pub async fn list_assignments(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AssignmentListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<DocumentAssignment>>>> {
    let client_id = match (params.client_id, params.document_id) {
        (None, Some(_)) => None,
        (client_id, _) => resolve_admin_scope(client_id, params.all_clients)?.client_id(),
    };

    let filter = AssignmentListFilter {
        client_id,
        document_id: params.document_id,
        limit: page.limit(),
        offset: page.offset(),
    };
    let assignments = DocumentAssignmentRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: assignments }))
}
