/// Pagination and sort normalization
///
/// List endpoints accept raw `page`, `size`, `sortBy` and `direction` query
/// parameters. [`normalize`] turns them into a [`PageRequest`] before anything
/// reaches storage:
///
/// - `page` is floored at 0
/// - `size` is clamped to `1..=50`
/// - `direction` must be `asc` or `desc` (case-insensitive)
/// - `sortBy` must name one of the resource's [`SortField`] keys
///
/// Out-of-range numbers are silently clamped; unknown sort keys and directions
/// are rejected.
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::TaskSortField;
/// use taskflow_shared::pagination::{normalize, SortDirection};
///
/// let request = normalize::<TaskSortField>(-5, 1000, "priority", "ASC").unwrap();
/// assert_eq!(request.page, 0);
/// assert_eq!(request.size, 50);
/// assert_eq!(request.sort.field, TaskSortField::Priority);
/// assert_eq!(request.sort.direction, SortDirection::Asc);
///
/// assert!(normalize::<TaskSortField>(0, 10, "nonexistentField", "desc").is_err());
/// ```

use serde::Serialize;

/// Default page index
pub const DEFAULT_PAGE: i64 = 0;

/// Default page size
pub const DEFAULT_SIZE: i64 = 10;

/// Largest page size a caller can request
pub const MAX_PAGE_SIZE: u32 = 50;

/// Default sort key (wire name)
pub const DEFAULT_SORT_BY: &str = "createdAt";

/// Default sort direction (wire name)
pub const DEFAULT_DIRECTION: &str = "desc";

/// Error type for pagination parameter validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Direction is neither `asc` nor `desc`
    #[error("direction must be asc or desc")]
    InvalidDirection(String),

    /// Sort key is not in the resource's allow-list
    #[error("Invalid sortBy. Allowed: {allowed}")]
    InvalidSortField {
        /// The rejected key
        value: String,

        /// Comma-separated allowed keys
        allowed: String,
    },
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending
    Asc,

    /// Descending
    Desc,
}

impl SortDirection {
    /// Parses `asc` / `desc`, ignoring case
    pub fn parse(raw: &str) -> Result<Self, PaginationError> {
        if raw.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(PaginationError::InvalidDirection(raw.to_string()))
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A closed set of sortable keys for one resource
///
/// Each key has a camelCase wire name and maps to a fixed column, so no
/// caller-supplied string is ever interpolated into a query.
pub trait SortField: Sized + Copy + Send + Sync + 'static {
    /// Allowed wire names and the key they select, in documentation order
    const ALLOWED: &'static [(&'static str, Self)];

    /// Column name used in `ORDER BY`
    fn column(&self) -> &'static str;

    /// Looks up a key by its exact wire name
    fn parse(raw: &str) -> Option<Self> {
        Self::ALLOWED
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, field)| *field)
    }

    /// Comma-separated list of allowed wire names
    fn allowed_list() -> String {
        Self::ALLOWED
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A validated sort specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    /// Key to sort by
    pub field: F,

    /// Direction
    pub direction: SortDirection,
}

/// A normalized page request, safe to hand to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    /// Zero-based page index
    pub page: u32,

    /// Page size, always within `1..=MAX_PAGE_SIZE`
    pub size: u32,

    /// Sort specification
    pub sort: Sort<F>,
}

impl<F> PageRequest<F> {
    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Maximum number of rows to return
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// Normalizes raw list parameters into a [`PageRequest`]
///
/// # Errors
///
/// Returns [`PaginationError::InvalidDirection`] for a direction other than
/// `asc`/`desc`, and [`PaginationError::InvalidSortField`] for a sort key not
/// in `F::ALLOWED`. The direction is checked first.
pub fn normalize<F: SortField>(
    page: i64,
    size: i64,
    sort_by: &str,
    direction: &str,
) -> Result<PageRequest<F>, PaginationError> {
    let direction = SortDirection::parse(direction)?;

    let field = F::parse(sort_by).ok_or_else(|| PaginationError::InvalidSortField {
        value: sort_by.to_string(),
        allowed: F::allowed_list(),
    })?;

    let page = page.clamp(0, i64::from(u32::MAX)) as u32;
    let size = size.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;

    Ok(PageRequest {
        page,
        size,
        sort: Sort { field, direction },
    })
}

/// One page of results
///
/// Serializes as `{content, page, size, totalElements, totalPages, last}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub content: Vec<T>,

    /// Zero-based page index
    pub page: u32,

    /// Requested page size
    pub size: u32,

    /// Total matching items across all pages
    pub total_elements: u64,

    /// Total number of pages (0 when there are no items)
    pub total_pages: u32,

    /// Whether this is the last page
    pub last: bool,
}

impl<T> Page<T> {
    /// Builds a page from one slice of results and the overall total
    pub fn new<F>(content: Vec<T>, request: &PageRequest<F>, total_elements: u64) -> Self {
        let size = u64::from(request.size);
        let total_pages = total_elements.div_ceil(size).min(u64::from(u32::MAX)) as u32;
        let last = u64::from(request.page) + 1 >= u64::from(total_pages);

        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            last,
        }
    }

    /// Maps the items, keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{project::ProjectSortField, task::TaskSortField};

    fn defaults<F: SortField>() -> PageRequest<F> {
        normalize::<F>(DEFAULT_PAGE, DEFAULT_SIZE, DEFAULT_SORT_BY, DEFAULT_DIRECTION).unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = defaults::<TaskSortField>();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 10);
        assert_eq!(request.sort.field, TaskSortField::CreatedAt);
        assert_eq!(request.sort.direction, SortDirection::Desc);

        let request = defaults::<ProjectSortField>();
        assert_eq!(request.sort.field, ProjectSortField::CreatedAt);
    }

    #[test]
    fn test_page_is_floored_at_zero() {
        let request = normalize::<TaskSortField>(-5, 10, "title", "asc").unwrap();
        assert_eq!(request.page, 0);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_size_is_clamped_both_ways() {
        assert_eq!(normalize::<TaskSortField>(0, 1000, "title", "asc").unwrap().size, 50);
        assert_eq!(normalize::<TaskSortField>(0, 0, "title", "asc").unwrap().size, 1);
        assert_eq!(normalize::<TaskSortField>(0, -3, "title", "asc").unwrap().size, 1);
        assert_eq!(normalize::<TaskSortField>(0, 50, "title", "asc").unwrap().size, 50);
    }

    #[test]
    fn test_huge_page_does_not_overflow_offset() {
        let request = normalize::<TaskSortField>(i64::MAX, 50, "title", "asc").unwrap();
        assert_eq!(request.page, u32::MAX);
        assert_eq!(request.offset(), i64::from(u32::MAX) * 50);
    }

    #[test]
    fn test_direction_is_case_insensitive() {
        for raw in ["asc", "ASC", "Asc"] {
            assert_eq!(SortDirection::parse(raw).unwrap(), SortDirection::Asc);
        }
        for raw in ["desc", "DESC", "DeSc"] {
            assert_eq!(SortDirection::parse(raw).unwrap(), SortDirection::Desc);
        }
    }

    #[test]
    fn test_invalid_direction_rejected() {
        let err = normalize::<TaskSortField>(0, 10, "title", "sideways").unwrap_err();
        assert_eq!(err, PaginationError::InvalidDirection("sideways".to_string()));
        assert_eq!(err.to_string(), "direction must be asc or desc");
    }

    #[test]
    fn test_task_sort_allow_list() {
        for key in ["createdAt", "dueDate", "title", "status", "priority"] {
            assert!(normalize::<TaskSortField>(0, 10, key, "asc").is_ok(), "{key} should be allowed");
        }

        let err = normalize::<TaskSortField>(0, 10, "nonexistentField", "asc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid sortBy. Allowed: createdAt, dueDate, title, status, priority"
        );
    }

    #[test]
    fn test_project_sort_allow_list() {
        for key in ["createdAt", "updatedAt", "dueDate", "name", "status"] {
            assert!(normalize::<ProjectSortField>(0, 10, key, "desc").is_ok(), "{key} should be allowed");
        }
        assert!(normalize::<ProjectSortField>(0, 10, "nonexistentField", "desc").is_err());
        assert!(normalize::<ProjectSortField>(0, 10, "owner_id; DROP TABLE users", "desc").is_err());
    }

    #[test]
    fn test_sort_key_matching_is_exact() {
        assert!(normalize::<TaskSortField>(0, 10, "created_at", "asc").is_err());
        assert!(normalize::<TaskSortField>(0, 10, "CreatedAt", "asc").is_err());
    }

    #[test]
    fn test_page_metadata() {
        let request = normalize::<TaskSortField>(1, 10, "title", "asc").unwrap();

        let page = Page::new(vec![1, 2, 3], &request, 13);
        assert_eq!(page.total_pages, 2);
        assert!(page.last);

        let first = normalize::<TaskSortField>(0, 10, "title", "asc").unwrap();
        let page = Page::new(vec![0; 10], &first, 13);
        assert!(!page.last);
    }

    #[test]
    fn test_empty_page() {
        let request = defaults::<TaskSortField>();
        let page: Page<i32> = Page::new(Vec::new(), &request, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.last);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let request = defaults::<TaskSortField>();
        let json = serde_json::to_value(Page::new(vec!["a"], &request, 1)).unwrap();
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["last"], true);
        assert_eq!(json["content"][0], "a");
    }
}
