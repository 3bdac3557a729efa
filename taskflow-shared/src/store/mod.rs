//! Entity storage abstraction.
//!
//! Services talk to storage only through [`EntityStore`]. Two implementations
//! ship with the crate:
//!
//! - [`PgStore`]: PostgreSQL via sqlx (production)
//! - [`MemoryStore`]: in-process maps (tests and local experiments)
//!
//! Both set `created_at`/`updated_at` themselves, keep `updated_at` strictly
//! increasing across updates, and cascade project deletion to its tasks.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    project::{CreateProject, Project, ProjectSortField, UpdateProject},
    task::{CreateTask, Task, TaskSortField, UpdateTask},
    user::{CreateUser, User},
};
use crate::pagination::{Page, PageRequest};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// Another user already has this email address.
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for users, projects and tasks.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Verifies the backing storage is reachable.
    async fn ping(&self) -> StoreResult<()>;

    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a user. Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by exact email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    // =========================================================================
    // Project operations
    // =========================================================================

    /// Creates a project.
    async fn create_project(&self, data: CreateProject) -> StoreResult<Project>;

    /// Gets a project by ID, whoever owns it.
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Lists one page of an owner's projects.
    async fn list_projects_by_owner(
        &self,
        owner_id: Uuid,
        request: &PageRequest<ProjectSortField>,
    ) -> StoreResult<Page<Project>>;

    /// Overwrites a project's editable fields.
    async fn update_project(&self, id: Uuid, data: UpdateProject) -> StoreResult<Project>;

    /// Deletes a project and all of its tasks.
    async fn delete_project(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Creates a task. The referenced project must exist.
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Gets a task by ID.
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Lists one page of a project's tasks.
    async fn list_tasks_by_project(
        &self,
        project_id: Uuid,
        request: &PageRequest<TaskSortField>,
    ) -> StoreResult<Page<Task>>;

    /// Overwrites a task's editable fields.
    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: Uuid) -> StoreResult<()>;
}
