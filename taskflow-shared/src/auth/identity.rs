/// Resolving the acting user
///
/// The HTTP layer decodes a bearer token into an [`AuthContext`] and hands it
/// to [`current_user`], which turns it into a stored [`User`]. Services never
/// look at tokens; they receive the resolved user as an argument.
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::identity::{current_user, IdentityError};
/// use taskflow_shared::store::MemoryStore;
///
/// # async fn example() {
/// let store = MemoryStore::new();
/// let err = current_user(&store, None).await.unwrap_err();
/// assert!(matches!(err, IdentityError::NotAuthenticated));
/// # }
/// ```

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::{User, UserRole};
use crate::store::{EntityStore, StoreError};

/// Authenticated principal attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// User ID from the token subject
    pub user_id: Uuid,

    /// Login email from the token
    pub email: String,

    /// Role at token issue time
    pub role: UserRole,
}

impl AuthContext {
    /// Builds a context from validated access token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
            role: claims.role,
        }
    }
}

/// Error type for identity resolution
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// No principal on the request
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The principal's email matches no stored user
    #[error("User not found for email: {0}")]
    UnknownUser(String),

    /// Lookup failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Returns the stored user behind `principal`
///
/// The lookup goes by email, the login identifier. A token for an account
/// that no longer exists is rejected here.
///
/// # Errors
///
/// - `NotAuthenticated` when `principal` is `None`
/// - `UnknownUser` when no user has the principal's email
/// - `Store` when the lookup itself fails
pub async fn current_user(
    store: &dyn EntityStore,
    principal: Option<&AuthContext>,
) -> Result<User, IdentityError> {
    let principal = principal.ok_or(IdentityError::NotAuthenticated)?;

    match store.find_user_by_email(&principal.email).await? {
        Some(user) => Ok(user),
        None => {
            warn!(email = %principal.email, "Token principal has no matching user");
            Err(IdentityError::UnknownUser(principal.email.clone()))
        }
    }
}
