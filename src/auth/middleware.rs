//! Per-request identity gate.
//!
//! Every request passes through [`require_identity`] before routing. Public
//! auth routes are let through untouched; everything else must present a valid
//! access token, either as `Authorization: Bearer <token>` or in the
//! [`TOKEN_COOKIE_NAME`] cookie.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::cookie::{TOKEN_COOKIE_NAME, get_cookie};
use super::errors::{AuthError, AuthErrorKind};
use super::types::Identity;
use crate::jwt::JwtConfig;

/// Paths that skip verification. Matched exactly.
pub const PUBLIC_PATHS: [&str; 3] = ["/api/auth/login", "/api/auth/register", "/api/auth/refresh"];

const BEARER_PREFIX: &str = "Bearer ";

/// Token from the Authorization header, if it uses the Bearer scheme.
fn token_from_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

/// Header first, then the token cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    token_from_header(headers)
        .or_else(|| get_cookie(headers, TOKEN_COOKIE_NAME).filter(|token| !token.is_empty()))
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Middleware that verifies the caller's access token and attaches an [`Identity`].
pub async fn require_identity(
    State(jwt): State<Arc<JwtConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = extract_token(request.headers()).ok_or_else(|| {
        debug!(path = %request.uri().path(), "Request without token");
        AuthError::new(AuthErrorKind::MissingToken)
    })?;

    let user_id = jwt.validate_access_token(token).map_err(|e| {
        debug!(path = %request.uri().path(), error = %e, "Rejected token");
        AuthError::new(AuthErrorKind::InvalidToken)
    })?;

    request.extensions_mut().insert(Identity { user_id });
    Ok(next.run(request).await)
}
