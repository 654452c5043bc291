/// In-memory store backend
///
/// A `HashMap`-backed implementation of the store traits, guarded by an
/// async `RwLock`. The integration tests drive the full router against this
/// backend so the suite runs without a database; it also serves local
/// development.
///
/// Email uniqueness is enforced case-insensitively to match the CITEXT
/// column of the PostgreSQL backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserStore};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, Role, User, UserSummary};

/// Store backend over in-process hash maps
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        let duplicate = users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email));
        if duplicate {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            role: Role::default(),
            google_id: data.google_id,
            is_verified: data.is_verified,
            last_login_at: None,
            reset_password_token: None,
            reset_password_expires_at: None,
            verification_token: data.verification_token,
            verification_token_expires_at: data.verification_token_expires_at,
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        let users = self.users.read().await;
        let mut summaries: Vec<(chrono::DateTime<Utc>, UserSummary)> = users
            .values()
            .map(|u| {
                (
                    u.created_at,
                    UserSummary {
                        id: u.id,
                        name: u.name.clone(),
                        email: u.email.clone(),
                        role: u.role,
                    },
                )
            })
            .collect();

        // Newest first, matching the PostgreSQL backend's ordering
        summaries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(summaries.into_iter().map(|(_, s)| s).collect())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn record_login(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        Ok(match users.get_mut(&id) {
            Some(user) => {
                user.last_login_at = Some(Utc::now());
                true
            }
            None => false,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Pending,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };

        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut assigned: Vec<Task> = tasks
            .values()
            .filter(|t| t.assigned_to == user_id)
            .cloned()
            .collect();

        assigned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(assigned)
    }

    async fn update_task_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.get_mut(&id).map(|task| {
            task.status = status;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password_hash: Some("$argon2id$hash".to_string()),
            name: "Test User".to_string(),
            google_id: None,
            is_verified: false,
            verification_token: None,
            verification_token_expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_defaults_to_user_role() {
        let store = MemoryStore::new();
        let user = store.create_user(sample_user("a@x.com")).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_case_insensitively() {
        let store = MemoryStore::new();
        store.create_user(sample_user("a@x.com")).await.unwrap();

        let result = store.create_user(sample_user("A@X.COM")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let store = MemoryStore::new();
        let created = store.create_user(sample_user("a@x.com")).await.unwrap();

        let found = store.find_user_by_email("A@x.COM").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_update_role_and_delete() {
        let store = MemoryStore::new();
        let user = store.create_user(sample_user("a@x.com")).await.unwrap();

        let updated = store
            .update_role(user.id, Role::Admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::Admin);

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(!store.delete_user(user.id).await.unwrap());
        assert!(store.find_user_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_role_missing_user_returns_none() {
        let store = MemoryStore::new();
        let result = store.update_role(Uuid::new_v4(), Role::Admin).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_record_login_stamps_timestamp() {
        let store = MemoryStore::new();
        let user = store.create_user(sample_user("a@x.com")).await.unwrap();

        assert!(store.record_login(user.id).await.unwrap());
        let reloaded = store.find_user_by_id(user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login_at.is_some());

        assert!(!store.record_login(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_task_lifecycle() {
        let store = MemoryStore::new();
        let admin = store.create_user(sample_user("admin@x.com")).await.unwrap();
        let assignee = store.create_user(sample_user("user@x.com")).await.unwrap();

        let task = store
            .create_task(CreateTask {
                title: "Rotate signing keys".to_string(),
                description: "Before the end of the quarter".to_string(),
                assigned_to: assignee.id,
                created_by: admin.id,
            })
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        let listed = store.list_tasks_for_user(assignee.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(store.list_tasks_for_user(admin.id).await.unwrap().is_empty());

        let updated = store
            .update_task_status(task.id, TaskStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
    }
}
