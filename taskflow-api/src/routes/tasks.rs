/// Task endpoints
///
/// Tasks live under a project and are reachable only by that project's
/// owner. Unlike projects, a task under someone else's project answers `403`.
///
/// # Endpoints
///
/// - `POST   /api/projects/:id/tasks` - Create task in project
/// - `GET    /api/projects/:id/tasks` - List project tasks (paged)
/// - `GET    /api/tasks/:id` - Get task
/// - `PUT    /api/tasks/:id` - Replace task fields
/// - `DELETE /api/tasks/:id` - Delete task

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, ApiQuery, CurrentUser, ValidJson},
    routes::ListParams,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    models::task::TaskStatus,
    pagination::Page,
    services::task::{self, TaskInput, TaskWithProject},
};
use uuid::Uuid;
use validator::Validate;

/// Create/update task request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    /// One of `TODO`, `IN_PROGRESS`, `DONE`
    pub status: Option<String>,

    pub due_date: Option<NaiveDate>,

    /// 1 (high) to 3 (low); defaults to 2
    pub priority: Option<i32>,
}

impl From<TaskRequest> for TaskInput {
    fn from(req: TaskRequest) -> Self {
        TaskInput {
            title: req.title,
            description: req.description,
            status: req.status,
            due_date: req.due_date,
            priority: req.priority,
        }
    }
}

/// Task as returned to clients, with its project's id and name
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: i32,
    pub project_id: Uuid,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskWithProject> for TaskResponse {
    fn from(TaskWithProject { task, project }: TaskWithProject) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            priority: task.priority,
            project_id: task.project_id,
            project_name: project.name,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Creates a task in one of the caller's projects
///
/// # Errors
///
/// - `400 Bad Request`: blank title, missing/unknown status, priority out of range
/// - `403 Forbidden`: project belongs to someone else
/// - `404 Not Found`: project does not exist
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(project_id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<TaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let created = task::create(state.store.as_ref(), project_id, req.into(), &user).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Lists a project's tasks
///
/// Sortable by `createdAt`, `dueDate`, `title`, `status`, `priority`.
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Page<TaskResponse>>> {
    let page =
        task::list_for_project(state.store.as_ref(), project_id, &params.into(), &user).await?;
    Ok(Json(page.map(TaskResponse::from)))
}

pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let found = task::get_by_id(state.store.as_ref(), id, &user).await?;
    Ok(Json(found.into()))
}

pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<TaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let updated = task::update(state.store.as_ref(), id, req.into(), &user).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    task::delete(state.store.as_ref(), id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
