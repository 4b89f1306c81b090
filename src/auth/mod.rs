//! JWT authentication for API routes.
//!
//! A single middleware gates every request: public auth routes pass through,
//! all others need a valid access token. The verified user ID reaches
//! handlers as the [`Identity`] extractor.

mod cookie;
mod errors;
mod middleware;
mod types;

pub use cookie::{TOKEN_COOKIE_NAME, get_cookie};
pub use errors::{AuthError, AuthErrorKind};
pub use middleware::{PUBLIC_PATHS, extract_token, is_public_path, require_identity};
pub use types::Identity;
