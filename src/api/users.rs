use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use super::error::{ApiError, ResultExt};
use crate::auth::Identity;
use crate::db::Database;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/{id}", get(get_user))
        .with_state(state)
}

/// Public fields of any user. Any authenticated caller may look anyone up.
async fn get_user(
    State(state): State<UsersState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid user ID"))?;

    let user = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}
