/// Integration tests for the task service
///
/// Run against the in-memory store; no database required.

mod common;

use chrono::NaiveDate;
use common::{list_query, project_input, seed_user, task_input};
use taskflow_shared::models::{
    project::CreateProject, project::ProjectStatus, task::CreateTask, task::TaskStatus,
};
use taskflow_shared::services::{
    project,
    task::{self, TaskInput},
    ListQuery, ServiceError,
};
use taskflow_shared::store::{EntityStore, MemoryStore};
use uuid::Uuid;

#[tokio::test]
async fn test_create_under_owned_project() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();

    let input = TaskInput {
        description: Some("write it".to_string()),
        due_date: NaiveDate::from_ymd_opt(2025, 5, 1),
        ..task_input("T1", "TODO", Some(1))
    };
    let created = task::create(&store, p1.id, input, &alice).await.unwrap();

    assert_eq!(created.task.title, "T1");
    assert_eq!(created.task.priority, 1);
    assert_eq!(created.task.status, TaskStatus::Todo);
    assert_eq!(created.task.project_id, p1.id);
    assert_eq!(created.project.name, "P1");
}

#[tokio::test]
async fn test_missing_priority_defaults_to_two() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();

    let created = task::create(&store, p1.id, task_input("T1", "TODO", None), &alice)
        .await
        .unwrap();
    assert_eq!(created.task.priority, 2);

    let stored = store.find_task(created.task.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, 2);
}

#[tokio::test]
async fn test_priority_out_of_range_rejected() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();

    for priority in [0, 4, -1] {
        let err = task::create(&store, p1.id, task_input("T1", "TODO", Some(priority)), &alice)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::BadRequest(ref m) if m == "Priority must be between 1 and 3"),
            "priority {priority}"
        );
    }
}

#[tokio::test]
async fn test_blank_title_rejected_before_writing() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();

    let err = task::create(&store, p1.id, task_input("  ", "TODO", None), &alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(ref m) if m == "Title is required"));

    let page = task::list_for_project(&store, p1.id, &ListQuery::default(), &alice)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 0);
}

#[tokio::test]
async fn test_bad_status_rejected() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();

    let err = task::create(&store, p1.id, task_input("T1", "BLOCKED", None), &alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(ref m) if m == "Invalid task status: BLOCKED"));

    // Project statuses are not task statuses
    let err = task::create(&store, p1.id, task_input("T1", "OPEN", None), &alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn test_create_in_missing_project_is_not_found() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;

    let err = task::create(&store, Uuid::new_v4(), task_input("T1", "TODO", None), &alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Project not found"));
}

#[tokio::test]
async fn test_other_users_task_is_forbidden() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let bob = seed_user(&store, "bob").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();
    let t1 = task::create(&store, p1.id, task_input("T1", "TODO", Some(2)), &alice)
        .await
        .unwrap();

    let err = task::get_by_id(&store, t1.task.id, &bob).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(ref m) if m == "Not your project"));

    let err = task::update(&store, t1.task.id, task_input("x", "DONE", None), &bob)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = task::delete(&store, t1.task.id, &bob).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = task::create(&store, p1.id, task_input("T2", "TODO", None), &bob)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = task::list_for_project(&store, p1.id, &ListQuery::default(), &bob)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_ownership_failures_differ_between_projects_and_tasks() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let bob = seed_user(&store, "bob").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();
    let t1 = task::create(&store, p1.id, task_input("T1", "TODO", None), &alice)
        .await
        .unwrap();

    assert!(matches!(
        project::get_by_id(&store, p1.id, &bob).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        task::get_by_id(&store, t1.task.id, &bob).await,
        Err(ServiceError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;

    let err = task::get_by_id(&store, Uuid::new_v4(), &alice).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Task not found"));
}

#[tokio::test]
async fn test_update_overwrites_and_keeps_project() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();
    let created = task::create(&store, p1.id, task_input("T1", "TODO", Some(3)), &alice)
        .await
        .unwrap();

    let updated = task::update(&store, created.task.id, task_input("T1b", "DONE", None), &alice)
        .await
        .unwrap();
    let fetched = task::get_by_id(&store, created.task.id, &alice).await.unwrap();

    assert_eq!(fetched, updated);
    assert_eq!(fetched.task.title, "T1b");
    assert_eq!(fetched.task.status, TaskStatus::Done);
    assert_eq!(fetched.task.priority, 2);
    assert_eq!(fetched.task.project_id, p1.id);
    assert_eq!(fetched.task.created_at, created.task.created_at);
    assert!(fetched.task.updated_at > created.task.updated_at);
}

#[tokio::test]
async fn test_delete_task() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();
    let t1 = task::create(&store, p1.id, task_input("T1", "TODO", None), &alice)
        .await
        .unwrap();

    task::delete(&store, t1.task.id, &alice).await.unwrap();
    assert!(matches!(
        task::get_by_id(&store, t1.task.id, &alice).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_sorting_and_paging() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();
    for (title, priority) in [("b", 2), ("c", 3), ("a", 1)] {
        task::create(&store, p1.id, task_input(title, "TODO", Some(priority)), &alice)
            .await
            .unwrap();
    }

    let page = task::list_for_project(&store, p1.id, &list_query(0, 10, "title", "DESC"), &alice)
        .await
        .unwrap();
    let titles: Vec<_> = page.content.iter().map(|t| t.task.title.as_str()).collect();
    assert_eq!(titles, ["c", "b", "a"]);
    assert!(page.content.iter().all(|t| t.project.id == p1.id));

    let page = task::list_for_project(&store, p1.id, &list_query(2, 1, "priority", "asc"), &alice)
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].task.priority, 3);
    assert_eq!(page.total_pages, 3);
    assert!(page.last);
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_field() {
    let store = MemoryStore::new();
    let alice = seed_user(&store, "alice").await;
    let p1 = project::create(&store, project_input("P1", "OPEN"), &alice)
        .await
        .unwrap();

    let err = task::list_for_project(&store, p1.id, &list_query(0, 10, "nonexistentField", "desc"), &alice)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::BadRequest(ref m)
            if m == "Invalid sortBy. Allowed: createdAt, dueDate, title, status, priority"
    ));
}

/// A store whose tasks can point at a project that doesn't exist
#[tokio::test]
async fn test_dangling_project_reference_is_forbidden() {
    use async_trait::async_trait;
    use taskflow_shared::models::{
        project::{Project, ProjectSortField, UpdateProject},
        task::{Task, TaskSortField, UpdateTask},
        user::{CreateUser, User},
    };
    use taskflow_shared::pagination::{Page, PageRequest};
    use taskflow_shared::store::StoreResult;

    struct HidesProjects(MemoryStore);

    #[async_trait]
    impl EntityStore for HidesProjects {
        async fn ping(&self) -> StoreResult<()> {
            self.0.ping().await
        }
        async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
            self.0.create_user(data).await
        }
        async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
            self.0.find_user(id).await
        }
        async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
            self.0.find_user_by_email(email).await
        }
        async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
            self.0.create_project(data).await
        }
        async fn find_project(&self, _id: Uuid) -> StoreResult<Option<Project>> {
            Ok(None)
        }
        async fn list_projects_by_owner(
            &self,
            owner_id: Uuid,
            request: &PageRequest<ProjectSortField>,
        ) -> StoreResult<Page<Project>> {
            self.0.list_projects_by_owner(owner_id, request).await
        }
        async fn update_project(&self, id: Uuid, data: UpdateProject) -> StoreResult<Project> {
            self.0.update_project(id, data).await
        }
        async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
            self.0.delete_project(id).await
        }
        async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
            self.0.create_task(data).await
        }
        async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
            self.0.find_task(id).await
        }
        async fn list_tasks_by_project(
            &self,
            project_id: Uuid,
            request: &PageRequest<TaskSortField>,
        ) -> StoreResult<Page<Task>> {
            self.0.list_tasks_by_project(project_id, request).await
        }
        async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Task> {
            self.0.update_task(id, data).await
        }
        async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
            self.0.delete_task(id).await
        }
    }

    let inner = MemoryStore::new();
    let alice = seed_user(&inner, "alice").await;
    let p1 = inner
        .create_project(CreateProject {
            name: "P1".to_string(),
            description: None,
            due_date: None,
            status: ProjectStatus::Open,
            owner_id: alice.id,
        })
        .await
        .unwrap();
    let t1 = inner
        .create_task(CreateTask {
            title: "T1".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            priority: 2,
            project_id: p1.id,
        })
        .await
        .unwrap();

    let store = HidesProjects(inner);
    let err = task::get_by_id(&store, t1.id, &alice).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(ref m) if m == "Project has no owner"));
}
