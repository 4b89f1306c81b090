//! Authentication API endpoints.
//!
//! - POST `/register` - Create an account
//! - POST `/login` - Exchange credentials for an access/refresh pair
//! - POST `/refresh` - Exchange a refresh token for a new pair

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{ApiError, JsonBody, ResultExt};
use super::validation::{password_within_limit, valid_email, valid_password};
use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::password::PasswordHasher;

#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub hasher: PasswordHasher,
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .with_state(state)
}

#[derive(Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Serialize)]
struct PublicUser {
    id: i64,
    username: String,
    email: String,
}

#[derive(Serialize)]
struct RegisterResponse {
    message: &'static str,
    user: PublicUser,
}

async fn register(
    State(state): State<AuthState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload;

    if username.trim().is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }

    if !valid_email(&email) {
        return Err(ApiError::bad_request("invalid email format"));
    }

    let taken = state
        .db
        .users()
        .exists_by_username_or_email(&username, &email)
        .await
        .db_err("Failed to check username/email availability")?;

    if taken {
        return Err(ApiError::bad_request("username or email already in use"));
    }

    if !valid_password(&password) {
        return Err(ApiError::bad_request(
            "password must be at least 8 characters long",
        ));
    }

    if !password_within_limit(&password) {
        return Err(ApiError::bad_request("password must be at most 72 bytes long"));
    }

    let hasher = state.hasher;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .internal_err("Failed to hash password")?
        .internal_err("Failed to hash password")?;

    let id = match state
        .db
        .users()
        .create(&username, &email, &password_hash)
        .await
    {
        Ok(id) => id,
        // Lost a race with a concurrent registration
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::bad_request("username or email already in use"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to create user", e)),
    };

    info!(user_id = id, username = %username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User successfully registered",
            user: PublicUser {
                id,
                username,
                email,
            },
        }),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

async fn login(
    State(state): State<AuthState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(stored) = state
        .db
        .users()
        .find_by_username(&payload.username)
        .await
        .db_err("Failed to look up user")?
    else {
        warn!(username = %payload.username, "Login for unknown user");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let hasher = state.hasher;
    let password = payload.password;
    let matches =
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored.password_hash))
            .await
            .internal_err("Failed to verify password")?;

    if !matches {
        warn!(user_id = stored.id, "Login with wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let pair = state
        .jwt
        .issue(stored.id)
        .internal_err("Failed to generate token")?;

    info!(user_id = stored.id, "User logged in");

    Ok(Json(LoginResponse {
        token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

#[derive(Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Serialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
    /// Access token expiry (Unix seconds)
    at_expires: u64,
    /// Refresh token expiry (Unix seconds)
    rt_expires: u64,
    user_id: i64,
}

async fn refresh(
    State(state): State<AuthState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = state
        .jwt
        .validate_refresh_token(&payload.refresh_token)
        .map_err(|e| {
            warn!(error = %e, "Rejected refresh token");
            ApiError::unauthorized("Invalid or expired refresh token")
        })?;

    let pair = state
        .jwt
        .issue(user_id)
        .internal_err("Failed to generate tokens")?;

    Ok(Json(RefreshResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        at_expires: pair.access_expires_at,
        rt_expires: pair.refresh_expires_at,
        user_id: pair.user_id,
    }))
}
