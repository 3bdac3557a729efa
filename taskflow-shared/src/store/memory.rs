//! In-memory entity store for testing.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    project::{CreateProject, Project, ProjectSortField, UpdateProject},
    task::{CreateTask, Task, TaskSortField, UpdateTask},
    user::{CreateUser, User},
};
use crate::pagination::{Page, PageRequest, SortDirection};

use super::{EntityStore, StoreError, StoreResult};

/// In-memory entity store.
///
/// Sorting mirrors [`PgStore`](super::PgStore): enum keys order by
/// declaration, missing due dates sort last in either direction, and ties
/// fall back to ascending `id`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Next `updated_at` value, strictly after `previous`
fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Compares optional keys with `None` always last
fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_projects(a: &Project, b: &Project, request: &PageRequest<ProjectSortField>) -> Ordering {
    let direction = request.sort.direction;
    let primary = match request.sort.field {
        ProjectSortField::CreatedAt => directed(a.created_at.cmp(&b.created_at), direction),
        ProjectSortField::UpdatedAt => directed(a.updated_at.cmp(&b.updated_at), direction),
        ProjectSortField::DueDate => nulls_last(a.due_date, b.due_date, direction),
        ProjectSortField::Name => directed(a.name.cmp(&b.name), direction),
        ProjectSortField::Status => directed(a.status.cmp(&b.status), direction),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

fn compare_tasks(a: &Task, b: &Task, request: &PageRequest<TaskSortField>) -> Ordering {
    let direction = request.sort.direction;
    let primary = match request.sort.field {
        TaskSortField::CreatedAt => directed(a.created_at.cmp(&b.created_at), direction),
        TaskSortField::DueDate => nulls_last(a.due_date, b.due_date, direction),
        TaskSortField::Title => directed(a.title.cmp(&b.title), direction),
        TaskSortField::Status => directed(a.status.cmp(&b.status), direction),
        TaskSortField::Priority => directed(a.priority.cmp(&b.priority), direction),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Cuts one page out of an already sorted list
fn slice_page<T, F>(sorted: Vec<T>, request: &PageRequest<F>) -> Page<T> {
    let total = sorted.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);

    let content = sorted.into_iter().skip(offset).take(limit).collect();
    Page::new(content, request, total)
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == data.email) {
            return Err(StoreError::DuplicateEmail(data.email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    // =========================================================================
    // Project operations
    // =========================================================================

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        if !self.users.read().await.contains_key(&data.owner_id) {
            return Err(StoreError::not_found("User", data.owner_id));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            due_date: data.due_date,
            status: data.status,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(&id).cloned())
    }

    async fn list_projects_by_owner(
        &self,
        owner_id: Uuid,
        request: &PageRequest<ProjectSortField>,
    ) -> StoreResult<Page<Project>> {
        let projects = self.projects.read().await;
        let mut result: Vec<Project> = projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| compare_projects(a, b, request));

        Ok(slice_page(result, request))
    }

    async fn update_project(&self, id: Uuid, data: UpdateProject) -> StoreResult<Project> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Project", id))?;

        project.name = data.name;
        project.description = data.description;
        project.due_date = data.due_date;
        project.status = data.status;
        project.updated_at = touch(project.updated_at);

        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        // Lock order: projects, then tasks
        let mut projects = self.projects.write().await;
        let mut tasks = self.tasks.write().await;

        if projects.remove(&id).is_none() {
            return Err(StoreError::not_found("Project", id));
        }
        tasks.retain(|_, task| task.project_id != id);
        Ok(())
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let projects = self.projects.read().await;
        if !projects.contains_key(&data.project_id) {
            return Err(StoreError::not_found("Project", data.project_id));
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            priority: data.priority,
            project_id: data.project_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_tasks_by_project(
        &self,
        project_id: Uuid,
        request: &PageRequest<TaskSortField>,
    ) -> StoreResult<Page<Task>> {
        let tasks = self.tasks.read().await;
        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| compare_tasks(a, b, request));

        Ok(slice_page(result, request))
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Task", id))?;

        task.title = data.title;
        task.description = data.description;
        task.status = data.status;
        task.due_date = data.due_date;
        task.priority = data.priority;
        task.updated_at = touch(task.updated_at);

        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.remove(&id).is_none() {
            return Err(StoreError::not_found("Task", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{project::ProjectStatus, task::TaskStatus, user::UserRole};
    use crate::pagination::normalize;

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(CreateUser {
                username: "user".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap()
    }

    async fn seed_project(store: &MemoryStore, owner: Uuid, name: &str) -> Project {
        store
            .create_project(CreateProject {
                name: name.to_string(),
                description: None,
                due_date: None,
                status: ProjectStatus::Open,
                owner_id: owner,
            })
            .await
            .unwrap()
    }

    async fn seed_task(
        store: &MemoryStore,
        project: Uuid,
        title: &str,
        priority: i32,
        due_date: Option<NaiveDate>,
    ) -> Task {
        store
            .create_task(CreateTask {
                title: title.to_string(),
                description: None,
                status: TaskStatus::Todo,
                due_date,
                priority,
                project_id: project,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        seed_user(&store, "a@example.com").await;

        let err = store
            .create_user(CreateUser {
                username: "other".to_string(),
                email: "a@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "a@example.com"));
    }

    #[tokio::test]
    async fn test_list_projects_scoped_by_owner() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice@example.com").await;
        let bob = seed_user(&store, "bob@example.com").await;
        seed_project(&store, alice.id, "P1").await;
        seed_project(&store, alice.id, "P2").await;
        seed_project(&store, bob.id, "B1").await;

        let request = normalize::<ProjectSortField>(0, 10, "name", "asc").unwrap();
        let page = store.list_projects_by_owner(alice.id, &request).await.unwrap();
        let names: Vec<_> = page.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["P1", "P2"]);
        assert_eq!(page.total_elements, 2);
    }

    #[tokio::test]
    async fn test_update_strictly_advances_updated_at() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice@example.com").await;
        let project = seed_project(&store, alice.id, "P1").await;

        let mut previous = project.updated_at;
        for _ in 0..3 {
            let updated = store
                .update_project(
                    project.id,
                    UpdateProject {
                        name: "P1".to_string(),
                        description: None,
                        due_date: None,
                        status: ProjectStatus::Done,
                    },
                )
                .await
                .unwrap();
            assert!(updated.updated_at > previous);
            assert_eq!(updated.created_at, project.created_at);
            previous = updated.updated_at;
        }
    }

    #[tokio::test]
    async fn test_delete_project_cascades_to_tasks() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice@example.com").await;
        let doomed = seed_project(&store, alice.id, "doomed").await;
        let kept = seed_project(&store, alice.id, "kept").await;
        let doomed_task = seed_task(&store, doomed.id, "a", 2, None).await;
        let kept_task = seed_task(&store, kept.id, "b", 2, None).await;

        store.delete_project(doomed.id).await.unwrap();

        assert!(store.find_task(doomed_task.id).await.unwrap().is_none());
        assert!(store.find_task(kept_task.id).await.unwrap().is_some());
        assert!(matches!(
            store.delete_project(doomed.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_task_requires_project() {
        let store = MemoryStore::new();
        let err = store
            .create_task(CreateTask {
                title: "orphan".to_string(),
                description: None,
                status: TaskStatus::Todo,
                due_date: None,
                priority: 2,
                project_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Project", .. }));
    }

    #[tokio::test]
    async fn test_list_tasks_sorted_and_paged() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice@example.com").await;
        let project = seed_project(&store, alice.id, "P1").await;
        for (title, priority) in [("c", 3), ("a", 1), ("b", 2)] {
            seed_task(&store, project.id, title, priority, None).await;
        }

        let request = normalize::<TaskSortField>(0, 2, "priority", "asc").unwrap();
        let page = store.list_tasks_by_project(project.id, &request).await.unwrap();
        let titles: Vec<_> = page.content.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert!(!page.last);

        let request = normalize::<TaskSortField>(1, 2, "priority", "asc").unwrap();
        let page = store.list_tasks_by_project(project.id, &request).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].title, "c");
        assert!(page.last);
    }

    #[tokio::test]
    async fn test_missing_due_dates_sort_last_both_ways() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice@example.com").await;
        let project = seed_project(&store, alice.id, "P1").await;
        let early = NaiveDate::from_ymd_opt(2025, 1, 1);
        let late = NaiveDate::from_ymd_opt(2025, 6, 1);
        seed_task(&store, project.id, "none", 2, None).await;
        seed_task(&store, project.id, "late", 2, late).await;
        seed_task(&store, project.id, "early", 2, early).await;

        for (direction, expected) in [
            ("asc", ["early", "late", "none"]),
            ("desc", ["late", "early", "none"]),
        ] {
            let request = normalize::<TaskSortField>(0, 10, "dueDate", direction).unwrap();
            let page = store.list_tasks_by_project(project.id, &request).await.unwrap();
            let titles: Vec<_> = page.content.iter().map(|t| t.title.as_str()).collect();
            assert_eq!(titles, expected, "direction {direction}");
        }
    }

    #[tokio::test]
    async fn test_equal_keys_break_ties_by_id() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice@example.com").await;
        for _ in 0..5 {
            seed_project(&store, alice.id, "same").await;
        }

        let request = normalize::<ProjectSortField>(0, 50, "name", "desc").unwrap();
        let page = store.list_projects_by_owner(alice.id, &request).await.unwrap();
        let ids: Vec<_> = page.content.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
