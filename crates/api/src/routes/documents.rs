//! Route definitions for the `/documents` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// The upload route lifts axum's default body limit; the ingestion guard
/// enforces the configured ceiling while streaming.
///
/// ```text
/// GET    /                -> list_documents (admin)
/// POST   /upload          -> upload_document (admin)
/// GET    /types/list      -> list_document_types
/// GET    /{id}            -> get_document
/// DELETE /{id}            -> delete_document (admin)
/// GET    /{id}/download   -> download_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::list_documents))
        .route(
            "/upload",
            post(documents::upload_document).layer(DefaultBodyLimit::disable()),
        )
        .route("/types/list", get(documents::list_document_types))
        .route(
            "/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/{id}/download", get(documents::download_document))
}
