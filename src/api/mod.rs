mod auth;
mod cart;
mod error;
mod users;
mod validation;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::password::PasswordHasher;

pub use error::{ApiError, JsonBody};
pub use validation::{MIN_PASSWORD_LENGTH, password_within_limit, valid_email, valid_password};

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, hasher: PasswordHasher) -> Router {
    let auth_state = auth::AuthState {
        db: db.clone(),
        jwt,
        hasher,
    };

    let users_state = users::UsersState { db: db.clone() };

    let cart_state = cart::CartState { db };

    Router::new()
        .nest("/auth", auth::router(auth_state))
        .nest("/users", users::router(users_state))
        .nest("/cart", cart::router(cart_state))
}
