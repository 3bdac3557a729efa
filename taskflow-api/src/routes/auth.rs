/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Token refresh
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get tokens
/// - `POST /api/auth/refresh` - Refresh access token

use crate::{app::AppState, error::ApiResult, extract::ValidJson};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::jwt::TokenType,
    models::user::{User, UserRole},
    services::{
        account::{self, NewAccount, TokenPair},
        ServiceError,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    /// Email address (login identifier)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Identity, role and tokens returned by register and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,

    #[serde(flatten)]
    pub tokens: TokenPair,
}

impl AuthResponse {
    fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            tokens,
        }
    }
}

/// Refresh token request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "a@x.com",
///   "password": "pw"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "userId": "uuid",
///   "username": "alice",
///   "email": "a@x.com",
///   "role": "USER",
///   "accessToken": "eyJ...",
///   "refreshToken": "eyJ...",
///   "tokenType": "Bearer",
///   "expiresIn": 86400
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let user = account::register(
        state.store.as_ref(),
        NewAccount {
            username: req.username,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    let tokens = account::issue_tokens(&user, state.jwt_secret()).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, tokens))))
}

/// Login endpoint
///
/// Authenticates a user and returns JWT tokens. The response body has the
/// same shape as [`register`].
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = account::login(state.store.as_ref(), &req.email, &req.password).await?;

    let tokens = account::issue_tokens(&user, state.jwt_secret()).map_err(ServiceError::from)?;
    Ok(Json(AuthResponse::new(user, tokens)))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// ```text
/// POST /api/auth/refresh
///
/// { "refreshToken": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token =
        account::refresh(state.store.as_ref(), &req.refresh_token, state.jwt_secret()).await?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer",
        expires_in: TokenType::Access.default_expiration().num_seconds(),
    }))
}
