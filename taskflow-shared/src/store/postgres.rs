//! PostgreSQL-backed entity store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::db::pool::health_check;
use crate::models::{
    project::{CreateProject, Project, ProjectSortField, UpdateProject},
    task::{CreateTask, Task, TaskSortField, UpdateTask},
    user::{CreateUser, User},
};
use crate::pagination::{Page, PageRequest};

use super::{EntityStore, StoreError, StoreResult};

/// Unique constraint on `users.email`
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Entity store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool. Migrations must already be applied.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn total_elements(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let email = data.email.clone();
        User::create(&self.pool, data).await.map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_CONSTRAINT) => {
                StoreError::DuplicateEmail(email)
            }
            other => StoreError::Database(other),
        })
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        Ok(Project::create(&self.pool, data).await?)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects_by_owner(
        &self,
        owner_id: Uuid,
        request: &PageRequest<ProjectSortField>,
    ) -> StoreResult<Page<Project>> {
        let (projects, total) = Project::list_by_owner(&self.pool, owner_id, request).await?;
        debug!(%owner_id, returned = projects.len(), total, "Listed projects");
        Ok(Page::new(projects, request, total_elements(total)))
    }

    async fn update_project(&self, id: Uuid, data: UpdateProject) -> StoreResult<Project> {
        Project::update(&self.pool, id, data)
            .await?
            .ok_or_else(|| StoreError::not_found("Project", id))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        if !Project::delete(&self.pool, id).await? {
            return Err(StoreError::not_found("Project", id));
        }
        Ok(())
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let project_id = data.project_id;
        Task::create(&self.pool, data).await.map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                StoreError::not_found("Project", project_id)
            }
            other => StoreError::Database(other),
        })
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks_by_project(
        &self,
        project_id: Uuid,
        request: &PageRequest<TaskSortField>,
    ) -> StoreResult<Page<Task>> {
        let (tasks, total) = Task::list_by_project(&self.pool, project_id, request).await?;
        debug!(%project_id, returned = tasks.len(), total, "Listed tasks");
        Ok(Page::new(tasks, request, total_elements(total)))
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Task> {
        Task::update(&self.pool, id, data)
            .await?
            .ok_or_else(|| StoreError::not_found("Task", id))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        if !Task::delete(&self.pool, id).await? {
            return Err(StoreError::not_found("Task", id));
        }
        Ok(())
    }
}
