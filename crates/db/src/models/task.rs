//! Compliance task model and DTOs.

use compliance_core::priority::Priority;
use compliance_core::task::TaskStatus;
use compliance_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub task_type: String,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub completed_date: Option<Timestamp>,
    pub client_id: DbId,
    pub created_by: DbId,
    pub assigned_to: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub task_type: String,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub client_id: DbId,
    pub created_by: DbId,
    pub assigned_to: Option<DbId>,
}

/// Fully-resolved field values written by
/// [`TaskRepo::update`](crate::repositories::TaskRepo::update).
///
/// The handler merges the caller's partial update onto the current row and
/// validates the status change before building this.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub completed_date: Option<Timestamp>,
    pub assigned_to: Option<DbId>,
}

/// Filter for [`TaskRepo::list`](crate::repositories::TaskRepo::list).
#[derive(Debug, Clone, Default)]
pub struct TaskListFilter {
    /// `None` lists every tenant.
    pub client_id: Option<DbId>,
    pub status: Option<TaskStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// Compact task entry for the client dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UpcomingTask {
    pub id: DbId,
    pub title: String,
    pub due_date: Option<Timestamp>,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
}
