//! Compliance task status machine and client-facing ordering.
//!
//! Valid transitions:
//!
//! ```text
//! pending ──> in_progress ──> completed
//!    │             │
//!    └─────────────┴────────> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. Re-setting the current status is
//! accepted as a no-op.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::access::Principal;
use crate::error::CoreError;
use crate::priority::Priority;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// Statuses counted as "open work" on the dashboard.
pub const OPEN_TASK_STATUSES: [TaskStatus; 2] = [TaskStatus::Pending, TaskStatus::InProgress];

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (Pending, InProgress) | (InProgress, Completed) => true,
            (Pending | InProgress, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid task status '{s}'. Must be one of: pending, in_progress, completed, cancelled"
                ))
            })
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reject an illegal status change with [`CoreError::Conflict`].
pub fn validate_transition(current: TaskStatus, next: TaskStatus) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Task cannot move from '{current}' to '{next}'"
        )))
    }
}

/// Check that `assignee` may own a task belonging to `task_client_id`.
///
/// Admins may be assigned any task; a client user only tasks of their own
/// tenant.
pub fn ensure_assignable(assignee: &Principal, task_client_id: DbId) -> Result<(), CoreError> {
    if assignee.is_admin || assignee.client_id == Some(task_client_id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "User {} cannot be assigned a task of client {task_client_id}",
            assignee.user_id
        )))
    }
}

/// Completion timestamp to persist after a status change.
///
/// Entering `completed` stamps `now`; every other change keeps the existing
/// value.
pub fn completion_stamp(
    current: TaskStatus,
    next: TaskStatus,
    existing: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    if next == TaskStatus::Completed && current != TaskStatus::Completed {
        Some(now)
    } else {
        existing
    }
}

/// Client-facing task order: due date ascending (undated last), then
/// priority descending.
pub fn compare_for_client(
    a_due: Option<Timestamp>,
    a_priority: Priority,
    b_due: Option<Timestamp>,
    b_priority: Priority,
) -> Ordering {
    let by_due = match (a_due, b_due) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_due.then_with(|| b_priority.cmp(&a_priority))
}

/// Sort `items` into client-facing order. The sort is stable, so callers that
/// pre-order by id get a fully deterministic result.
pub fn sort_for_client<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (Option<Timestamp>, Priority),
{
    items.sort_by(|a, b| {
        let (a_due, a_prio) = key(a);
        let (b_due, b_prio) = key(b);
        compare_for_client(a_due, a_prio, b_due, b_prio)
    });
}
