/// User provisioning endpoint
///
/// `POST /api/users` creates a login-capable account without issuing
/// tokens. It answers `201` with an empty body.

use crate::{app::AppState, error::ApiResult, extract::ValidJson};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use taskflow_shared::services::account::{self, NewAccount};
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Provisions a user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or "Email already used"
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> ApiResult<StatusCode> {
    account::create_user(
        state.store.as_ref(),
        NewAccount {
            username: req.username,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok(StatusCode::CREATED)
}
