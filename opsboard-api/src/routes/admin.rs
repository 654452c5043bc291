/// Administrative endpoints
///
/// User management and task assignment. The route group is layered with
/// the session gate plus the Admin role gate, except the task listing,
/// which any authenticated role may call.
///
/// # Endpoints
///
/// - `GET    /api/admin/users/:user_id` - List all users (Admin)
/// - `DELETE /api/admin/delete/user/:user_id` - Delete a user (Admin)
/// - `PATCH  /api/admin/update/user/:user_id` - Change a user's role (Admin)
/// - `POST   /api/admin/assign/task/:user_id` - Assign a task (Admin)
/// - `GET    /api/admin/tasks/:user_id` - List a user's tasks (authenticated)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use opsboard_shared::auth::session::{issue_session_cookie, Identity};
use opsboard_shared::models::task::{CreateTask, Task};
use opsboard_shared::models::user::{Role, User, UserSummary};

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};

/// User listing response
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    /// Always true on success
    pub success: bool,

    /// Identity/role projection of every user
    pub users: Vec<UserSummary>,
}

/// Role update request
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// Requested role, must be one of the enumerated values
    pub role: String,
}

/// Role update response
#[derive(Debug, Serialize)]
pub struct UpdateRoleResponse {
    /// Always true on success
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,

    /// The updated account
    pub user: User,
}

/// Task assignment request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    /// Task title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    /// Task description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Assignee user id
    pub assigned_to: Uuid,
}

/// Task assignment response
#[derive(Debug, Serialize)]
pub struct AssignTaskResponse {
    /// Always true on success
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,

    /// The created task
    pub task: Task,
}

/// Task listing response
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    /// Always true on success
    pub success: bool,

    /// Tasks assigned to the requested user, newest first
    pub tasks: Vec<Task>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    /// Always true on success
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,
}

/// List every user (Admin)
///
/// Returns the identity/role projection only; credential material is
/// excluded by projection, not by stripping.
pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<Json<ListUsersResponse>> {
    let users = state.users.list_users().await?;

    Ok(Json(ListUsersResponse {
        success: true,
        users,
    }))
}

/// Delete a user (Admin)
///
/// # Errors
///
/// - `404 Not Found`: no user with that id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<DeleteUserResponse>> {
    let deleted = state.users.delete_user(user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(%user_id, "user deleted");

    Ok(Json(DeleteUserResponse {
        success: true,
        message: "User deleted successfully".to_string(),
    }))
}

/// Change a user's role (Admin)
///
/// Validates the requested role against the enumerated set, updates the
/// record, and re-issues a session cookie reflecting the new role. The
/// update is idempotent: setting the current role again succeeds and still
/// re-issues a valid cookie.
///
/// The previous token is not revoked; it stays valid until its own
/// expiry.
///
/// # Errors
///
/// - `400 Bad Request`: role outside {User, Admin}
/// - `404 Not Found`: no user with that id
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    jar: CookieJar,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<(CookieJar, Json<UpdateRoleResponse>)> {
    let role = Role::parse(&req.role)
        .ok_or_else(|| ApiError::ValidationError("Invalid role".to_string()))?;

    let user = state
        .users
        .update_role(user_id, role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let cookie = issue_session_cookie(user.id, user.role, &state.config.auth.token_secret)?;

    tracing::info!(%user_id, role = role.as_str(), "role updated");

    Ok((
        jar.add(cookie),
        Json(UpdateRoleResponse {
            success: true,
            message: "User role updated successfully".to_string(),
            user,
        }),
    ))
}

/// Assign a task to a user (Admin)
///
/// The assignee comes from the request body; the creating Admin is the
/// session identity.
///
/// # Errors
///
/// - `400 Bad Request`: empty title/description
/// - `404 Not Found`: assignee does not resolve
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<(StatusCode, Json<AssignTaskResponse>)> {
    req.validate().map_err(validation_error)?;

    let assignee = state
        .users
        .find_user_by_id(req.assigned_to)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let task = state
        .tasks
        .create_task(CreateTask {
            title: req.title,
            description: req.description,
            assigned_to: assignee.id,
            created_by: identity.user_id,
        })
        .await?;

    tracing::info!(task_id = %task.id, assigned_to = %assignee.id, "task assigned");

    Ok((
        StatusCode::CREATED,
        Json(AssignTaskResponse {
            success: true,
            message: "Task assigned successfully".to_string(),
            task,
        }),
    ))
}

/// List the tasks assigned to a user
///
/// Open to any authenticated role; ownership beyond authentication is not
/// checked (documented gap).
pub async fn get_user_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ListTasksResponse>> {
    let tasks = state.tasks.list_tasks_for_user(user_id).await?;

    Ok(Json(ListTasksResponse {
        success: true,
        tasks,
    }))
}
