/// Middleware modules for the API server
///
/// - `security`: OWASP security headers on every response
///
/// JWT authentication is an `axum::middleware::from_fn_with_state` function
/// in [`crate::app`].

pub mod security;
