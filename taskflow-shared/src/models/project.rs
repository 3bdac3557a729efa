/// Project model and database operations
///
/// A project belongs to exactly one owner. The owner is set at creation and
/// never changes; all project queries that serve a user are scoped by
/// `owner_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('OPEN', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     due_date DATE,
///     status project_status NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id),
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

/// Project lifecycle status
///
/// Ordering follows declaration order, matching the Postgres enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Not started
    Open,

    /// Work in progress
    InProgress,

    /// Finished
    Done,
}

impl WireEnum for ProjectStatus {
    const KIND: &'static str = "status";
    const VARIANTS: &'static [Self] = &[
        ProjectStatus::Open,
        ProjectStatus::InProgress,
        ProjectStatus::Done,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Open => "OPEN",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Done => "DONE",
        }
    }
}

/// Sortable project keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSortField {
    CreatedAt,
    UpdatedAt,
    DueDate,
    Name,
    Status,
}

impl SortField for ProjectSortField {
    const ALLOWED: &'static [(&'static str, Self)] = &[
        ("createdAt", ProjectSortField::CreatedAt),
        ("updatedAt", ProjectSortField::UpdatedAt),
        ("dueDate", ProjectSortField::DueDate),
        ("name", ProjectSortField::Name),
        ("status", ProjectSortField::Status),
    ];

    fn column(&self) -> &'static str {
        match self {
            ProjectSortField::CreatedAt => "created_at",
            ProjectSortField::UpdatedAt => "updated_at",
            ProjectSortField::DueDate => "due_date",
            ProjectSortField::Name => "name",
            ProjectSortField::Status => "status",
        }
    }
}

/// Project model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name (never blank)
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Current status
    pub status: ProjectStatus,

    /// Owning user (immutable)
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub owner_id: Uuid,
}

/// Replacement values for a project's editable fields
///
/// Every field is overwritten; `None` clears optional fields.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

const PROJECT_COLUMNS: &str =
    "id, name, description, due_date, status, owner_id, created_at, updated_at";

impl Project {
    /// Inserts a project; timestamps are set by the database
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, due_date, status, owner_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PROJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(data.due_date)
            .bind(data.status)
            .bind(data.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");

        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists one page of an owner's projects
    ///
    /// Returns the page's rows and the total count of the owner's projects.
    /// Ties on the sort key are broken by `id`.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        request: &PageRequest<ProjectSortField>,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        // Column and direction come from closed enums, never from raw input
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = $1 \
             ORDER BY {} {} NULLS LAST, id ASC \
             LIMIT $2 OFFSET $3",
            request.sort.field.column(),
            request.sort.direction.as_sql(),
        );

        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok((projects, total))
    }

    /// Overwrites a project's editable fields and refreshes `updated_at`
    ///
    /// Returns `None` if the project no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE projects \
             SET name = $2, description = $3, due_date = $4, status = $5, \
                 updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 \
             RETURNING {PROJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.description)
            .bind(data.due_date)
            .bind(data.status)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a project; its tasks are removed by `ON DELETE CASCADE`
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
