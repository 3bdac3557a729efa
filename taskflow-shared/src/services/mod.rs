/// Business operations on accounts, projects and tasks
///
/// Services validate raw input, apply defaults, enforce ownership and then
/// delegate to an [`EntityStore`](crate::store::EntityStore). Every operation
/// that acts on behalf of a user takes that user explicitly as `&User`.
///
/// # Modules
///
/// - [`account`]: Registration, login and user provisioning
/// - [`project`]: Owner-scoped project CRUD
/// - [`task`]: Task CRUD under an owned project

pub mod account;
pub mod project;
pub mod task;

use crate::auth::{
    access::AccessError, identity::IdentityError, jwt::JwtError, password::PasswordError,
};
use crate::models::InvalidEnumValue;
use crate::pagination::PaginationError;
use crate::store::StoreError;

/// Error type for service operations
///
/// The first four variants carry a user-facing message; the rest wrap
/// infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation
    #[error("{0}")]
    BadRequest(String),

    /// Caller is not authenticated or credentials are wrong
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but may not touch the resource
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist (or is hidden from the caller)
    #[error("{0}")]
    NotFound(String),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing failure
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token signing failure
    #[error(transparent)]
    Token(#[from] JwtError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<InvalidEnumValue> for ServiceError {
    fn from(err: InvalidEnumValue) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

impl From<PaginationError> for ServiceError {
    fn from(err: PaginationError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

impl From<AccessError> for ServiceError {
    fn from(err: AccessError) -> Self {
        ServiceError::Forbidden(err.to_string())
    }
}

impl From<IdentityError> for ServiceError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Store(e) => ServiceError::Store(e),
            other => ServiceError::Unauthorized(other.to_string()),
        }
    }
}

/// Returns the value if present and not blank, else `BadRequest(message)`
pub(crate) fn required(value: Option<String>, message: &str) -> ServiceResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::BadRequest(message.to_string())),
    }
}

/// Raw list parameters as they arrive from a query string
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: i64,
    pub size: i64,
    pub sort_by: String,
    pub direction: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        use crate::pagination::{DEFAULT_DIRECTION, DEFAULT_PAGE, DEFAULT_SIZE, DEFAULT_SORT_BY};

        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            sort_by: DEFAULT_SORT_BY.to_string(),
            direction: DEFAULT_DIRECTION.to_string(),
        }
    }
}
