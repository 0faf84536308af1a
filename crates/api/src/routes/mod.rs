pub mod admin;
pub mod auth;
pub mod client;
pub mod documents;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/register                           create account (admin)
/// /auth/me                                 current user
/// /auth/logout                             logout
///
/// /admin/clients                           list, create
/// /admin/clients/{id}                      get, update, deactivate
/// /admin/users                             list, create
/// /admin/documents/assign                  assign document to client
/// /admin/documents/assignments             list active assignments
/// /admin/tasks                             list, create
/// /admin/tasks/{id}                        get, update
/// /admin/inquiries                         list
/// /admin/inquiries/{id}/respond            respond
///
/// /client/documents                        assigned documents
/// /client/tasks                            tasks in client order
/// /client/inquiries                        list, submit
/// /client/inquiries/{id}                   detail
/// /client/dashboard/summary                counts + upcoming tasks
///
/// /documents                               list (admin)
/// /documents/upload                        upload (admin, multipart)
/// /documents/types/list                    known document types
/// /documents/{id}                          detail, delete (admin)
/// /documents/{id}/download                 stream file
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/client", client::router())
        .nest("/documents", documents::router())
}
