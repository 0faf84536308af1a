//! Handlers for the `/admin/tasks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use compliance_core::error::CoreError;
use compliance_core::priority::Priority;
use compliance_core::task::{completion_stamp, ensure_assignable, validate_transition, TaskStatus};
use compliance_core::tenant::resolve_admin_scope;
use compliance_core::types::{DbId, Timestamp};
use compliance_db::models::task::{CreateTask, Task, TaskChanges, TaskListFilter};
use compliance_db::repositories::{ClientRepo, TaskRepo, UserRepo};
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

/// Request body for `POST /admin/tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Task type is required"))]
    pub task_type: String,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub client_id: DbId,
    pub assigned_to: Option<DbId>,
}

/// Request body for `PUT /admin/tasks/{id}`. Omitted fields are unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Timestamp>,
    pub assigned_to: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct TaskStatusParams {
    pub status: Option<TaskStatus>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/tasks
pub async fn create_task(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    input.validate()?;
    ClientRepo::find_active(&state.pool, input.client_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        })?;
    if let Some(assignee) = input.assigned_to {
        check_assignee(&state, assignee, input.client_id).await?;
    }

    let task = TaskRepo::create(
        &state.pool,
        &CreateTask {
            title: input.title.trim().to_string(),
            description: input.description,
            task_type: input.task_type,
            priority: input.priority,
            due_date: input.due_date,
            client_id: input.client_id,
            created_by: admin.user_id(),
            assigned_to: input.assigned_to,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, client_id = task.client_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/admin/tasks?client_id=&all_clients=&status=&limit=&offset=
pub async fn list_tasks(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(scope): Query<AdminScopeParams>,
    Query(params): Query<TaskStatusParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let scope = resolve_admin_scope(scope.client_id, scope.all_clients)?;
    let filter = TaskListFilter {
        client_id: scope.client_id(),
        status: params.status,
        limit: page.limit(),
        offset: page.offset(),
    };
    let tasks = TaskRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/admin/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;
    Ok(Json(task))
}

/// PUT /api/admin/tasks/{id}
///
/// Status changes follow the task state machine. The write only lands if the
/// status read here is still current.
pub async fn update_task(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    input.validate()?;
    let current = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;
    if let Some(assignee) = input.assigned_to {
        check_assignee(&state, assignee, current.client_id).await?;
    }

    let changes = merge_changes(&current, input, Utc::now())?;
    let updated = TaskRepo::update(&state.pool, id, current.status, &changes)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Task was modified by another request".into(),
            ))
        })?;

    if updated.status != current.status {
        tracing::info!(
            task_id = id,
            from = %current.status,
            to = %updated.status,
            updated_by = admin.user_id(),
            "Task status changed",
        );
    }
    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The assignee must be an active user who is an admin or belongs to the
/// task's client.
async fn check_assignee(state: &AppState, user_id: DbId, client_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
    ensure_assignable(&user.principal(), client_id)?;
    Ok(())
}

/// Overlay a partial update onto the current row, enforcing the status
/// machine and stamping the completion date.
fn merge_changes(
    current: &Task,
    input: UpdateTaskRequest,
    now: Timestamp,
) -> Result<TaskChanges, CoreError> {
    let status = input.status.unwrap_or(current.status);
    validate_transition(current.status, status)?;

    Ok(TaskChanges {
        title: input
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| current.title.clone()),
        description: input.description.or_else(|| current.description.clone()),
        status,
        priority: input.priority.unwrap_or(current.priority),
        due_date: input.due_date.or(current.due_date),
        completed_date: completion_stamp(current.status, status, current.completed_date, now),
        assigned_to: input.assigned_to.or(current.assigned_to),
    })
}
