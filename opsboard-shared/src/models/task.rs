/// Task model and assignment records
///
/// Tasks are created by an Admin, assigned to a user, and move through a
/// three-state lifecycle driven by the update-status endpoint. There is no
/// delete operation.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     assigned_to UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task lifecycle status
///
/// Wire strings are the human-facing labels the dashboard submits:
/// `"Pending"`, `"In Progress"`, `"Completed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned but not started
    Pending,

    /// Being worked on by the assignee
    #[serde(rename = "In Progress")]
    InProgress,

    /// Finished
    Completed,
}

impl TaskStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Parses a client-submitted status string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(TaskStatus::Pending),
            "In Progress" => Some(TaskStatus::InProgress),
            "Completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// What needs to be done
    pub description: String,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// User the task is assigned to
    pub assigned_to: Uuid,

    /// Admin who created the assignment
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short title (non-empty)
    pub title: String,

    /// Description (non-empty)
    pub description: String,

    /// Assignee user ID (must resolve to an existing user)
    pub assigned_to: Uuid,

    /// Creating Admin's user ID
    pub created_by: Uuid,
}
