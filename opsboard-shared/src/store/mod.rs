/// Persistence store abstraction
///
/// The credential store is expressed as a pair of object-safe async traits
/// so handlers and the identity verifier depend on the contract, not on a
/// concrete database. Two backends exist:
///
/// - [`postgres::PgStore`]: production backend over a sqlx connection pool
/// - [`memory::MemoryStore`]: in-process backend used by the integration
///   tests and for local development without a database
///
/// # Example
///
/// ```no_run
/// use opsboard_shared::models::user::CreateUser;
/// use opsboard_shared::store::{memory::MemoryStore, UserStore};
///
/// # async fn example() -> Result<(), opsboard_shared::store::StoreError> {
/// let store = MemoryStore::new();
///
/// let user = store
///     .create_user(CreateUser {
///         email: "user@example.com".to_string(),
///         password_hash: Some("$argon2id$...".to_string()),
///         name: "Test User".to_string(),
///         google_id: None,
///         is_verified: false,
///         verification_token: None,
///         verification_token_expires_at: None,
///     })
///     .await?;
///
/// assert!(store.find_user_by_id(user.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, Role, User, UserSummary};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Email already registered (unique constraint)
    #[error("Email already registered")]
    DuplicateEmail,

    /// Backend failure (connection loss, constraint violation, ...)
    #[error("Store error: {0}")]
    Backend(String),
}

/// Credential store operations over user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user
    ///
    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Finds a user by ID
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Finds a user by email (case-insensitive)
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Finds a user by federated provider id
    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError>;

    /// Lists all users as the Admin projection (no credential material)
    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError>;

    /// Updates a user's role, returning the updated record
    ///
    /// Returns `Ok(None)` when the user does not exist.
    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>, StoreError>;

    /// Deletes a user; true when a record was removed
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Stamps the last-login timestamp; true when the user exists
    async fn record_login(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Backend liveness probe for the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Store operations over task assignments
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Creates a new task assignment
    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// Finds a task by ID
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Lists the tasks assigned to a user, newest first
    async fn list_tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Updates a task's status, returning the updated record
    ///
    /// Returns `Ok(None)` when the task does not exist.
    async fn update_task_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError>;
}
