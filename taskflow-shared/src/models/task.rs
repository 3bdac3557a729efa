/// Task model and database operations
///
/// A task belongs to exactly one project and has no owner column of its own:
/// whoever owns the project owns its tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'TODO',
///     due_date DATE,
///     priority INTEGER NOT NULL DEFAULT 2 CHECK (priority BETWEEN 1 AND 3),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::WireEnum;
use crate::pagination::{PageRequest, SortField};

/// Priority stored when none is supplied
pub const DEFAULT_PRIORITY: i32 = 2;

/// Lowest allowed priority
pub const MIN_PRIORITY: i32 = 1;

/// Highest allowed priority
pub const MAX_PRIORITY: i32 = 3;

/// Task workflow status
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl WireEnum for TaskStatus {
    const KIND: &'static str = "task status";
    const VARIANTS: &'static [Self] = &[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

/// Sortable task keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    CreatedAt,
    DueDate,
    Title,
    Status,
    Priority,
}

impl SortField for TaskSortField {
    const ALLOWED: &'static [(&'static str, Self)] = &[
        ("createdAt", TaskSortField::CreatedAt),
        ("dueDate", TaskSortField::DueDate),
        ("title", TaskSortField::Title),
        ("status", TaskSortField::Status),
        ("priority", TaskSortField::Priority),
    ];

    fn column(&self) -> &'static str {
        match self {
            TaskSortField::CreatedAt => "created_at",
            TaskSortField::DueDate => "due_date",
            TaskSortField::Title => "title",
            TaskSortField::Status => "status",
            TaskSortField::Priority => "priority",
        }
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title (never blank)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Priority, 1 (highest) to 3
    pub priority: i32,

    /// Parent project (immutable)
    pub project_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: i32,
    pub project_id: Uuid,
}

/// Replacement values for a task's editable fields
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: i32,
}

const TASK_COLUMNS: &str =
    "id, title, description, status, due_date, priority, project_id, created_at, updated_at";

impl Task {
    /// Inserts a task; timestamps are set by the database
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, status, due_date, priority, project_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.due_date)
            .bind(data.priority)
            .bind(data.project_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists one page of a project's tasks
    ///
    /// Returns the page's rows and the total count of the project's tasks.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        request: &PageRequest<TaskSortField>,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 \
             ORDER BY {} {} NULLS LAST, id ASC \
             LIMIT $2 OFFSET $3",
            request.sort.field.column(),
            request.sort.direction.as_sql(),
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;

        Ok((tasks, total))
    }

    /// Overwrites a task's editable fields and refreshes `updated_at`
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks \
             SET title = $2, description = $3, status = $4, due_date = $5, priority = $6, \
                 updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.due_date)
            .bind(data.priority)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a task; returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
