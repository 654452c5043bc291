/// User-facing endpoints
///
/// Dashboard data and task status updates for the authenticated user.
///
/// # Endpoints
///
/// - `GET   /api/user/user-dashboard` - The session user's own record
/// - `PATCH /api/user/update-task/:task_id` - Update a task's status

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use opsboard_shared::auth::session::Identity;
use opsboard_shared::models::task::{Task, TaskStatus};
use opsboard_shared::models::user::User;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Always true on success
    pub success: bool,

    /// The session user's record
    pub user: User,
}

/// Task status update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// Requesting user id (also consumed by the session-gate fallback)
    pub user_id: Uuid,

    /// New status; must be one of the enumerated wire strings
    pub status: String,
}

/// Task status update response
#[derive(Debug, Serialize)]
pub struct UpdateTaskResponse {
    /// Always true on success
    pub success: bool,

    /// The updated task
    pub task: Task,
}

/// Fetch the session user's own record
///
/// # Errors
///
/// - `404 Not Found`: the session's user no longer exists
pub async fn user_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<DashboardResponse>> {
    let user = state
        .users
        .find_user_by_id(identity.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(DashboardResponse {
        success: true,
        user,
    }))
}

/// Update a task's status
///
/// Requires authentication only; whether the requester is the assignee is
/// not checked (documented gap).
///
/// # Errors
///
/// - `400 Bad Request`: status outside the enumerated set
/// - `404 Not Found`: unknown user or task id
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<UpdateTaskResponse>> {
    let status = TaskStatus::parse(&req.status)
        .ok_or_else(|| ApiError::ValidationError("Invalid status".to_string()))?;

    state
        .users
        .find_user_by_id(req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let task = state
        .tasks
        .update_task_status(task_id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(%task_id, status = status.as_str(), "task status updated");

    Ok(Json(UpdateTaskResponse {
        success: true,
        task,
    }))
}
