//! Handlers for the `/documents` resource.
//!
//! Uploads stream straight from the multipart body through the ingestion
//! guard; nothing is buffered in memory. Every read of a single document
//! passes the access gate.

use std::io;
use std::path::Path as FsPath;

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use compliance_core::access::{ensure_access, AccessGrant, Principal};
use compliance_core::document_types::{merge_document_types, normalize_document_type};
use compliance_core::error::CoreError;
use compliance_core::ingest::{ingest, remove_stored_file, StoredFile};
use compliance_core::types::DbId;
use compliance_db::models::document::{CreateDocument, Document, DocumentListFilter};
use compliance_db::repositories::{DocumentAssignmentRepo, DocumentRepo};
use futures::TryStreamExt;
use serde::Deserialize;
use tokio_util::io::{ReaderStream, StreamReader};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DocumentListParams {
    pub document_type: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/documents/upload
///
/// Multipart form with a required `file` field and optional `description`
/// and `document_type` fields, in any order.
pub async fn upload_document(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Document>)> {
    let policy = state.upload_policy();
    let mut stored: Option<(StoredFile, String)> = None;
    let mut description: Option<String> = None;
    let mut document_type: Option<String> = None;

    // Until `keep` is called below, any early return (or the request being
    // dropped) removes an already-ingested file.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" if stored.is_none() => {
                let original = field.file_name().unwrap_or("").to_string();
                let mime = field.content_type().map(str::to_string);
                let reader = StreamReader::new(field.map_err(io::Error::other));
                tokio::pin!(reader);
                let file = ingest(reader, &original, mime.as_deref(), &policy).await?;
                stored = Some((file, original));
            }
            "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                description = Some(text).filter(|t| !t.trim().is_empty());
            }
            "document_type" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                document_type = Some(text);
            }
            _ => {}
        }
    }

    let (file, original_filename) =
        stored.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let input = CreateDocument {
        filename: file.stored_name.clone(),
        original_filename: display_name(&original_filename),
        file_path: file.storage_path.to_string_lossy().into_owned(),
        file_size: i64::try_from(file.byte_size)
            .map_err(|_| AppError::InternalError("File size overflow".into()))?,
        mime_type: file.mime_type.clone(),
        description,
        document_type: normalize_document_type(document_type.as_deref()),
        uploaded_by: admin.user_id(),
    };

    let document = DocumentRepo::create(&state.pool, &input).await?;
    file.keep();

    tracing::info!(
        document_id = document.id,
        stored_name = %document.filename,
        file_size = document.file_size,
        uploaded_by = admin.user_id(),
        "Document uploaded",
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /api/documents?document_type=&include_inactive=&limit=&offset=
pub async fn list_documents(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<DocumentListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    let filter = DocumentListFilter {
        document_type: params.document_type,
        include_inactive: params.include_inactive,
        limit: page.limit(),
        offset: page.offset(),
    };
    let documents = DocumentRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Document>> {
    let document = load_accessible(&state, &auth.principal(), id).await?;
    Ok(Json(document))
}

/// GET /api/documents/{id}/download
///
/// Streams the stored file as an attachment named after the original upload.
pub async fn download_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let document = load_accessible(&state, &auth.principal(), id).await?;

    let file = match tokio::fs::File::open(&document.file_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(document_id = id, path = %document.file_path, "Stored file missing");
            return Err(AppError::Core(CoreError::NotFound {
                entity: "DocumentFile",
                id,
            }));
        }
        Err(e) => return Err(AppError::Core(CoreError::Storage(e.to_string()))),
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_filename(&document.original_filename)
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &document.mime_type)
        .header(header::CONTENT_LENGTH, document.file_size.to_string())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::InternalError(format!("Failed to build response: {e}")))
}

/// DELETE /api/documents/{id}
///
/// Soft-deletes the document and all its assignments, then removes the
/// stored file on a best-effort basis.
pub async fn delete_document(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let document = DocumentRepo::deactivate(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Document",
            id,
        })?;

    tracing::info!(document_id = id, deleted_by = admin.user_id(), "Document deactivated");
    discard(FsPath::new(&document.file_path)).await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/documents/types/list
pub async fn list_document_types(
    State(state): State<AppState>,
    RequireAuth(_auth): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let stored = DocumentRepo::list_types(&state.pool).await?;
    Ok(Json(DataResponse {
        data: merge_document_types(stored),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an active document and run it through the access gate.
///
/// Missing or inactive documents are `NotFound`; a denied check is
/// `Forbidden`.
async fn load_accessible(
    state: &AppState,
    principal: &Principal,
    id: DbId,
) -> AppResult<Document> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|d| d.is_active)
        .ok_or(CoreError::NotFound {
            entity: "Document",
            id,
        })?;

    let grants: Vec<AccessGrant> = if principal.is_admin {
        Vec::new()
    } else {
        DocumentAssignmentRepo::list_for_document(&state.pool, id)
            .await?
            .iter()
            .map(AccessGrant::from)
            .collect()
    };

    ensure_access(principal, document.access_ref(), &grants)?;
    Ok(document)
}

/// Best-effort removal of a stored file. Failures are logged, never returned.
async fn discard(path: &FsPath) {
    if let Err(e) = remove_stored_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file");
    }
}

/// Final path component of a client-supplied name, for display.
fn display_name(declared: &str) -> String {
    declared
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(declared)
        .to_string()
}

/// Strip characters that would break a quoted `Content-Disposition` value.
fn header_safe_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_drops_directories() {
        assert_eq!(display_name("../../etc/policy.pdf"), "policy.pdf");
        assert_eq!(display_name("C:\\Users\\hr\\handbook.docx"), "handbook.docx");
        assert_eq!(display_name("plain.txt"), "plain.txt");
    }

    #[test]
    fn header_filename_is_sanitized() {
        assert_eq!(header_safe_filename("a\"b\r\n.pdf"), "ab.pdf");
        assert_eq!(header_safe_filename("résumé.pdf"), "r_sum_.pdf");
    }
}
