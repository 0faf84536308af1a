//! Repository for the `tasks` table.

use compliance_core::task::{TaskStatus, OPEN_TASK_STATUSES};
use compliance_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, TaskChanges, TaskListFilter, UpcomingTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, task_type, status, priority, due_date, \
                        completed_date, client_id, created_by, assigned_to, is_active, \
                        created_at, updated_at";

/// Window, in days, for the dashboard's upcoming-task list.
pub const UPCOMING_WINDOW_DAYS: i32 = 7;

/// Maximum number of upcoming tasks on the dashboard.
pub const UPCOMING_LIMIT: i64 = 5;

fn open_statuses() -> Vec<&'static str> {
    OPEN_TASK_STATUSES.iter().map(|s| s.as_str()).collect()
}

/// Provides CRUD operations for compliance tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, description, task_type, status, priority, due_date,
                 client_id, created_by, assigned_to)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.task_type)
            .bind(TaskStatus::Pending.as_str())
            .bind(input.priority.as_str())
            .bind(input.due_date)
            .bind(input.client_id)
            .bind(input.created_by)
            .bind(input.assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Find an active task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active tasks for the admin view, newest first.
    pub async fn list(pool: &PgPool, filter: &TaskListFilter) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE is_active = true
               AND ($1::BIGINT IS NULL OR client_id = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(filter.client_id)
            .bind(filter.status.map(TaskStatus::as_str))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Active tasks of one client, ordered by id. The caller applies the
    /// client-facing sort.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE is_active = true
               AND client_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(client_id)
            .bind(status.map(TaskStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Write `changes` only if the task still has `expected_status`.
    ///
    /// Returns `None` when the row is missing, inactive, or its status moved
    /// since it was read.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        expected_status: TaskStatus,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = $3,
                description = $4,
                status = $5,
                priority = $6,
                due_date = $7,
                completed_date = $8,
                assigned_to = $9
             WHERE id = $1 AND status = $2 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(expected_status.as_str())
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.status.as_str())
            .bind(changes.priority.as_str())
            .bind(changes.due_date)
            .bind(changes.completed_date)
            .bind(changes.assigned_to)
            .fetch_optional(pool)
            .await
    }

    /// Number of open (`pending` or `in_progress`) tasks for a client.
    pub async fn count_open_for_client(pool: &PgPool, client_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks
             WHERE client_id = $1 AND is_active = true AND status = ANY($2)",
        )
        .bind(client_id)
        .bind(open_statuses())
        .fetch_one(pool)
        .await
    }

    /// Open tasks due within the next [`UPCOMING_WINDOW_DAYS`], soonest first.
    /// Overdue tasks are not upcoming and are left out.
    pub async fn upcoming_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<UpcomingTask>, sqlx::Error> {
        sqlx::query_as::<_, UpcomingTask>(
            "SELECT id, title, due_date, priority FROM tasks
             WHERE client_id = $1
               AND is_active = true
               AND status = ANY($2)
               AND due_date IS NOT NULL
               AND due_date >= NOW()
               AND due_date <= NOW() + make_interval(days => $3)
             ORDER BY due_date, id
             LIMIT $4",
        )
        .bind(client_id)
        .bind(open_statuses())
        .bind(UPCOMING_WINDOW_DAYS)
        .bind(UPCOMING_LIMIT)
        .fetch_all(pool)
        .await
    }
}
