/// Task operations under an owned project
///
/// Unlike projects, a task that exists but belongs to someone else's project
/// is reported as `Forbidden`, not `NotFound`.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::{required, ListQuery, ServiceError, ServiceResult};
use crate::auth::access::{ensure_project_owned, ensure_task_project_owned};
use crate::models::{
    parse_enum,
    project::Project,
    task::{
        CreateTask, Task, TaskSortField, TaskStatus, UpdateTask, DEFAULT_PRIORITY, MAX_PRIORITY,
        MIN_PRIORITY,
    },
    user::User,
};
use crate::pagination::{normalize, Page};
use crate::services::project::PROJECT_NOT_FOUND;
use crate::store::EntityStore;

pub const TASK_NOT_FOUND: &str = "Task not found";

/// Raw task fields from a create or update request
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<i32>,
}

/// A task together with the project it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWithProject {
    pub task: Task,
    pub project: Project,
}

struct TaskFields {
    title: String,
    description: Option<String>,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    priority: i32,
}

impl TaskInput {
    fn validate(self) -> ServiceResult<TaskFields> {
        let title = required(self.title, "Title is required")?;
        let status = required(self.status, "Status is required")?;
        let status = parse_enum::<TaskStatus>(&status)?;

        let priority = self.priority.unwrap_or(DEFAULT_PRIORITY);
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return Err(ServiceError::BadRequest(format!(
                "Priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}"
            )));
        }

        Ok(TaskFields {
            title,
            description: self.description,
            status,
            due_date: self.due_date,
            priority,
        })
    }
}

/// Loads a project for task work: `NotFound` if absent, `Forbidden` if not owned
async fn project_for_tasks(
    store: &dyn EntityStore,
    project_id: Uuid,
    user: &User,
) -> ServiceResult<Project> {
    let project = store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    ensure_project_owned(&project, user)?;
    Ok(project)
}

/// Loads a task and its project, checking the user owns the project
async fn owned_task(
    store: &dyn EntityStore,
    id: Uuid,
    user: &User,
) -> ServiceResult<TaskWithProject> {
    let task = store
        .find_task(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(TASK_NOT_FOUND.to_string()))?;

    let project = ensure_task_project_owned(store.find_project(task.project_id).await?, user)?;
    Ok(TaskWithProject { task, project })
}

/// Creates a task under one of the user's projects
///
/// A missing priority is stored as 2.
///
/// # Errors
///
/// - `NotFound` if the project doesn't exist
/// - `Forbidden` if the user doesn't own it
/// - `BadRequest` for a blank title, missing or unknown status, or a
///   priority outside 1..=3
pub async fn create(
    store: &dyn EntityStore,
    project_id: Uuid,
    input: TaskInput,
    user: &User,
) -> ServiceResult<TaskWithProject> {
    let project = project_for_tasks(store, project_id, user).await?;
    let fields = input.validate()?;

    let task = store
        .create_task(CreateTask {
            title: fields.title,
            description: fields.description,
            status: fields.status,
            due_date: fields.due_date,
            priority: fields.priority,
            project_id,
        })
        .await?;

    info!(task_id = %task.id, %project_id, "Task created");
    Ok(TaskWithProject { task, project })
}

/// Lists one page of a project's tasks
///
/// # Errors
///
/// `NotFound`/`Forbidden` as in [`create`]; `BadRequest` for an unknown sort
/// key or direction.
pub async fn list_for_project(
    store: &dyn EntityStore,
    project_id: Uuid,
    query: &ListQuery,
    user: &User,
) -> ServiceResult<Page<TaskWithProject>> {
    let project = project_for_tasks(store, project_id, user).await?;
    let request =
        normalize::<TaskSortField>(query.page, query.size, &query.sort_by, &query.direction)?;

    let page = store.list_tasks_by_project(project_id, &request).await?;
    debug!(%project_id, total = page.total_elements, "Tasks listed");

    Ok(page.map(|task| TaskWithProject {
        task,
        project: project.clone(),
    }))
}

/// Gets a task from one of the user's projects
pub async fn get_by_id(
    store: &dyn EntityStore,
    id: Uuid,
    user: &User,
) -> ServiceResult<TaskWithProject> {
    owned_task(store, id, user).await
}

/// Overwrites a task's fields; the project link never changes
pub async fn update(
    store: &dyn EntityStore,
    id: Uuid,
    input: TaskInput,
    user: &User,
) -> ServiceResult<TaskWithProject> {
    let TaskWithProject { project, .. } = owned_task(store, id, user).await?;
    let fields = input.validate()?;

    let task = store
        .update_task(
            id,
            UpdateTask {
                title: fields.title,
                description: fields.description,
                status: fields.status,
                due_date: fields.due_date,
                priority: fields.priority,
            },
        )
        .await?;

    info!(task_id = %id, "Task updated");
    Ok(TaskWithProject { task, project })
}

/// Deletes a task from one of the user's projects
pub async fn delete(store: &dyn EntityStore, id: Uuid, user: &User) -> ServiceResult<()> {
    owned_task(store, id, user).await?;
    store.delete_task(id).await?;

    info!(task_id = %id, "Task deleted");
    Ok(())
}
