//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::debug;

/// Why a request was turned away by the identity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No bearer header and no token cookie
    MissingToken,
    /// Token present but failed verification
    InvalidToken,
    /// Handler asked for an identity the middleware never attached
    NotAuthenticated,
}

/// Rejection returned by the identity middleware and the `Identity` extractor.
///
/// Every kind maps to the same 401 body so callers learn nothing about why.
#[derive(Debug)]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }
}

impl From<AuthErrorKind> for AuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self::new(kind)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        debug!(kind = ?self.kind, "Unauthorized request");

        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized",
            }),
        )
            .into_response()
    }
}
