//! Route definitions for the client portal.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::portal;
use crate::state::AppState;

/// Routes mounted at `/client`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/documents", get(portal::list_documents))
        .route("/tasks", get(portal::list_tasks))
        .route(
            "/inquiries",
            post(portal::submit_inquiry).get(portal::list_inquiries),
        )
        .route("/inquiries/{id}", get(portal::get_inquiry))
        .route("/dashboard/summary", get(portal::dashboard_summary))
}
