/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `users`: User provisioning
/// - `projects`: Project CRUD for the authenticated owner
/// - `tasks`: Task CRUD under an owned project

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

use serde::Deserialize;
use taskflow_shared::{
    pagination::{DEFAULT_DIRECTION, DEFAULT_PAGE, DEFAULT_SIZE, DEFAULT_SORT_BY},
    services::ListQuery,
};

/// Paging and sorting query parameters shared by list endpoints
///
/// ```text
/// ?page=0&size=10&sortBy=createdAt&direction=desc
/// ```
///
/// Values are passed through unclamped; the services normalize them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub direction: Option<String>,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        ListQuery {
            page: params.page.unwrap_or(DEFAULT_PAGE),
            size: params.size.unwrap_or(DEFAULT_SIZE),
            sort_by: params.sort_by.unwrap_or_else(|| DEFAULT_SORT_BY.to_string()),
            direction: params
                .direction
                .unwrap_or_else(|| DEFAULT_DIRECTION.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let query = ListQuery::from(ListParams::default());
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 10);
        assert_eq!(query.sort_by, "createdAt");
        assert_eq!(query.direction, "desc");
    }

    #[test]
    fn test_list_params_keep_raw_values() {
        let query = ListQuery::from(ListParams {
            page: Some(-5),
            size: Some(1000),
            sort_by: Some("priority".to_string()),
            direction: Some("ASC".to_string()),
        });
        assert_eq!(query.page, -5);
        assert_eq!(query.size, 1000);
        assert_eq!(query.sort_by, "priority");
        assert_eq!(query.direction, "ASC");
    }
}
