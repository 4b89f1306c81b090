//! Request identity attached by the authentication middleware.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::{AuthError, AuthErrorKind};

/// The verified user behind the current request.
///
/// Inserted into the request extensions by [`require_identity`](super::require_identity)
/// and read by handlers as an extractor. Lives exactly as long as the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(|| AuthError::new(AuthErrorKind::NotAuthenticated))
    }
}
