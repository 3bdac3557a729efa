/// Account registration, login and token issuance
///
/// Email is the login identifier. Passwords are hashed with Argon2id before
/// they reach the store.
///
/// # Example
///
/// ```
/// use taskflow_shared::services::account::{self, NewAccount};
/// use taskflow_shared::store::MemoryStore;
///
/// # async fn example() -> taskflow_shared::services::ServiceResult<()> {
/// let store = MemoryStore::new();
/// let alice = account::register(&store, NewAccount {
///     username: "alice".to_string(),
///     email: "a@x.com".to_string(),
///     password: "pw".to_string(),
/// }).await?;
///
/// let same = account::login(&store, "a@x.com", "pw").await?;
/// assert_eq!(same.id, alice.id);
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use tracing::{info, warn};

use super::{required, ServiceError, ServiceResult};
use crate::auth::{
    jwt::{create_token, validate_refresh_token, Claims, JwtError, TokenType},
    password::{hash_password, verify_password},
};
use crate::models::user::{CreateUser, User, UserRole};
use crate::store::{EntityStore, StoreError};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Access and refresh tokens issued together
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Signs a fresh access/refresh token pair for `user`
pub fn issue_tokens(user: &User, secret: &str) -> Result<TokenPair, JwtError> {
    let access = Claims::new(user.id, &user.email, user.role, TokenType::Access);
    let refresh = Claims::new(user.id, &user.email, user.role, TokenType::Refresh);

    Ok(TokenPair {
        access_token: create_token(&access, secret)?,
        refresh_token: create_token(&refresh, secret)?,
        token_type: "Bearer",
        expires_in: TokenType::Access.default_expiration().num_seconds(),
    })
}

/// Validates fields, rejects a taken email, hashes and stores the account
async fn insert_account(
    store: &dyn EntityStore,
    account: NewAccount,
    duplicate_message: &str,
) -> ServiceResult<User> {
    let username = required(Some(account.username), "Username is required")?;
    let email = required(Some(account.email), "Email is required")?;
    if account.password.is_empty() {
        return Err(ServiceError::BadRequest("Password is required".to_string()));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ServiceError::BadRequest(duplicate_message.to_string()));
    }

    let password_hash = hash_password(&account.password)?;

    match store
        .create_user(CreateUser {
            username,
            email,
            password_hash,
            role: UserRole::User,
        })
        .await
    {
        Ok(user) => Ok(user),
        // Lost a race with a concurrent registration
        Err(StoreError::DuplicateEmail(_)) => {
            Err(ServiceError::BadRequest(duplicate_message.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Registers a new account with role `USER`
///
/// # Errors
///
/// `BadRequest("Email already registered")` if the email is taken, or a
/// `BadRequest` naming the first blank field.
pub async fn register(store: &dyn EntityStore, account: NewAccount) -> ServiceResult<User> {
    let user = insert_account(store, account, "Email already registered").await?;
    info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// Provisions an account without signing it in
///
/// Same rules as [`register`], with `"Email already used"` for a taken email.
pub async fn create_user(store: &dyn EntityStore, account: NewAccount) -> ServiceResult<User> {
    let user = insert_account(store, account, "Email already used").await?;
    info!(user_id = %user.id, "User created");
    Ok(user)
}

/// Checks credentials and returns the matching user
///
/// Unknown email and wrong password fail identically.
pub async fn login(store: &dyn EntityStore, email: &str, password: &str) -> ServiceResult<User> {
    let Some(user) = store.find_user_by_email(email).await? else {
        warn!("Login failed: unknown email");
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = %user.id, "User logged in");
    Ok(user)
}

/// Exchanges a refresh token for a new access token
///
/// The user is re-read so the new token carries current email and role.
///
/// # Errors
///
/// `Unauthorized` if the token is invalid, expired, not a refresh token, or
/// its user no longer exists.
pub async fn refresh(
    store: &dyn EntityStore,
    refresh_token: &str,
    secret: &str,
) -> ServiceResult<String> {
    let claims = validate_refresh_token(refresh_token, secret).map_err(|e| {
        warn!(error = %e, "Refresh token rejected");
        ServiceError::Unauthorized("Invalid refresh token".to_string())
    })?;

    let user = store
        .find_user(claims.sub)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;

    let access = Claims::new(user.id, &user.email, user.role, TokenType::Access);
    Ok(create_token(&access, secret)?)
}
