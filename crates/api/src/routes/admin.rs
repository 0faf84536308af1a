//! Route definitions for the `/admin` resource. Every handler requires an
//! admin account.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{assignments, clients, inquiries, tasks, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/clients",
            post(clients::create_client).get(clients::list_clients),
        )
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::deactivate_client),
        )
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/documents/assign", post(assignments::assign_document))
        .route("/documents/assignments", get(assignments::list_assignments))
        .route("/tasks", post(tasks::create_task).get(tasks::list_tasks))
        .route("/tasks/{id}", get(tasks::get_task).put(tasks::update_task))
        .route("/inquiries", get(inquiries::list_inquiries))
        .route(
            "/inquiries/{id}/respond",
            put(inquiries::respond_to_inquiry),
        )
}
