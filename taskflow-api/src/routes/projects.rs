/// Project endpoints
///
/// All routes require a bearer token and act on the caller's own projects.
/// A project owned by someone else answers `404`, the same as one that does
/// not exist.
///
/// # Endpoints
///
/// - `POST   /api/projects` - Create project
/// - `GET    /api/projects` - List own projects (paged)
/// - `GET    /api/projects/:id` - Get project
/// - `PUT    /api/projects/:id` - Replace project fields
/// - `DELETE /api/projects/:id` - Delete project and its tasks

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
    models::{
        project::{Project, ProjectStatus},
        user::User,
    },
    pagination::Page,
    services::project::{self, ProjectInput},
};
use uuid::Uuid;
use validator::Validate;

/// Create/update project request
///
/// `name` and `status` are required; they are optional here so that a
/// missing value reaches the service and gets its specific message.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub due_date: Option<NaiveDate>,

    /// One of `OPEN`, `IN_PROGRESS`, `DONE`
    pub status: Option<String>,
}

impl From<ProjectRequest> for ProjectInput {
    fn from(req: ProjectRequest) -> Self {
        ProjectInput {
            name: req.name,
            description: req.description,
            due_date: req.due_date,
            status: req.status,
        }
    }
}

/// Project as returned to clients, with its owner's email
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub owner_id: Uuid,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    /// `owner` is the acting user; the ownership guard has already matched
    /// them against `p.owner_id`.
    fn new(p: Project, owner: &User) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            due_date: p.due_date,
            status: p.status,
            owner_id: p.owner_id,
            owner_email: owner.email.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Creates a project owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: blank name, missing or unknown status
/// - `401 Unauthorized`: no valid token
pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(req): ValidJson<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let created = project::create(state.store.as_ref(), req.into(), &user).await?;
    Ok((StatusCode::CREATED, Json(ProjectResponse::new(created, &user))))
}

/// Lists the caller's projects
///
/// Sortable by `name`, `status`, `dueDate`, `createdAt`, `updatedAt`.
///
/// # Errors
///
/// - `400 Bad Request`: unknown `sortBy` or `direction`
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Page<ProjectResponse>>> {
    let page = project::list(state.store.as_ref(), &user, &params.into()).await?;
    Ok(Json(page.map(|p| ProjectResponse::new(p, &user))))
}

pub async fn get_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let found = project::get_by_id(state.store.as_ref(), id, &user).await?;
    Ok(Json(ProjectResponse::new(found, &user)))
}

/// Overwrites a project's fields
///
/// Omitted optional fields are cleared.
pub async fn update_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<ProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    let updated = project::update(state.store.as_ref(), id, req.into(), &user).await?;
    Ok(Json(ProjectResponse::new(updated, &user)))
}

pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    project::delete(state.store.as_ref(), id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
