/// Project operations scoped to the acting user
///
/// A project the caller doesn't own is reported as not found, so ids of other
/// users' projects can't be probed.
///
/// # Example
///
/// ```
/// use taskflow_shared::services::project::{self, ProjectInput};
/// # use taskflow_shared::models::user::User;
/// # use taskflow_shared::store::MemoryStore;
///
/// # async fn example(store: &MemoryStore, alice: &User) -> taskflow_shared::services::ServiceResult<()> {
/// let created = project::create(store, ProjectInput {
///     name: Some("P1".to_string()),
///     status: Some("OPEN".to_string()),
///     ..Default::default()
/// }, alice).await?;
///
/// let fetched = project::get_by_id(store, created.id, alice).await?;
/// assert_eq!(fetched.name, "P1");
/// # Ok(())
/// # }
/// ```

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::{required, ListQuery, ServiceError, ServiceResult};
use crate::auth::access::ensure_project_owned;
use crate::models::{
    parse_enum,
    project::{CreateProject, Project, ProjectSortField, ProjectStatus, UpdateProject},
    user::User,
};
use crate::pagination::{normalize, Page};
use crate::store::EntityStore;

pub const PROJECT_NOT_FOUND: &str = "Project not found";

/// Raw project fields from a create or update request
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Validated project fields
struct ProjectFields {
    name: String,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    status: ProjectStatus,
}

impl ProjectInput {
    fn validate(self) -> ServiceResult<ProjectFields> {
        let name = required(self.name, "Project name is required")?;
        let status = required(self.status, "Status is required")?;
        let status = parse_enum::<ProjectStatus>(&status)?;

        Ok(ProjectFields {
            name,
            description: self.description,
            due_date: self.due_date,
            status,
        })
    }
}

/// Loads a project the user owns, or `NotFound`
pub(crate) async fn owned_project(
    store: &dyn EntityStore,
    id: Uuid,
    user: &User,
) -> ServiceResult<Project> {
    let project = store
        .find_project(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    if ensure_project_owned(&project, user).is_err() {
        return Err(ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()));
    }
    Ok(project)
}

/// Creates a project owned by `user`
///
/// # Errors
///
/// `BadRequest` for a blank name, missing status, or unknown status.
pub async fn create(
    store: &dyn EntityStore,
    input: ProjectInput,
    user: &User,
) -> ServiceResult<Project> {
    let fields = input.validate()?;

    let project = store
        .create_project(CreateProject {
            name: fields.name,
            description: fields.description,
            due_date: fields.due_date,
            status: fields.status,
            owner_id: user.id,
        })
        .await?;

    info!(project_id = %project.id, owner_id = %user.id, "Project created");
    Ok(project)
}

/// Lists one page of the user's projects
///
/// # Errors
///
/// `BadRequest` for an unknown sort key or direction.
pub async fn list(
    store: &dyn EntityStore,
    user: &User,
    query: &ListQuery,
) -> ServiceResult<Page<Project>> {
    let request =
        normalize::<ProjectSortField>(query.page, query.size, &query.sort_by, &query.direction)?;

    let page = store.list_projects_by_owner(user.id, &request).await?;
    debug!(owner_id = %user.id, total = page.total_elements, "Projects listed");
    Ok(page)
}

/// Gets one of the user's projects
pub async fn get_by_id(store: &dyn EntityStore, id: Uuid, user: &User) -> ServiceResult<Project> {
    owned_project(store, id, user).await
}

/// Overwrites one of the user's projects
///
/// All fields are re-validated as in [`create`]; the owner never changes.
pub async fn update(
    store: &dyn EntityStore,
    id: Uuid,
    input: ProjectInput,
    user: &User,
) -> ServiceResult<Project> {
    owned_project(store, id, user).await?;
    let fields = input.validate()?;

    let project = store
        .update_project(
            id,
            UpdateProject {
                name: fields.name,
                description: fields.description,
                due_date: fields.due_date,
                status: fields.status,
            },
        )
        .await?;

    info!(project_id = %id, "Project updated");
    Ok(project)
}

/// Deletes one of the user's projects together with its tasks
pub async fn delete(store: &dyn EntityStore, id: Uuid, user: &User) -> ServiceResult<()> {
    owned_project(store, id, user).await?;
    store.delete_project(id).await?;

    info!(project_id = %id, "Project deleted");
    Ok(())
}
