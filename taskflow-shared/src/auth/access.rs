/// Ownership checks for projects and tasks
///
/// A user may touch a project only if they own it, and a task only if they
/// own the task's project. These guards run before every read-by-id, update
/// and delete.

use tracing::warn;

use crate::models::{project::Project, user::User};

/// Error type for ownership checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The acting user does not own the project
    #[error("Not your project")]
    NotOwner,

    /// A task points at a project that does not exist
    #[error("Project has no owner")]
    MissingOwner,
}

/// Checks that `user` owns `project`
pub fn ensure_project_owned(project: &Project, user: &User) -> Result<(), AccessError> {
    if project.owner_id != user.id {
        warn!(project_id = %project.id, user_id = %user.id, "Project access denied");
        return Err(AccessError::NotOwner);
    }
    Ok(())
}

/// Checks that `user` owns the project a task belongs to, returning it
///
/// `project` is the task's resolved parent; `None` means the reference
/// dangles, which is a data-integrity fault rather than a missing task.
pub fn ensure_task_project_owned(
    project: Option<Project>,
    user: &User,
) -> Result<Project, AccessError> {
    let project = project.ok_or(AccessError::MissingOwner)?;
    ensure_project_owned(&project, user)?;
    Ok(project)
}
