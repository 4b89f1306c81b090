use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use super::error::{ApiError, ResultExt};
use crate::auth::Identity;
use crate::db::Database;

#[derive(Clone)]
pub struct CartState {
    pub db: Database,
}

pub fn router(state: CartState) -> Router {
    Router::new().route("/", get(get_cart)).with_state(state)
}

/// Items in the caller's own cart.
async fn get_cart(
    State(state): State<CartState>,
    identity: Identity,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .db
        .cart()
        .list_by_user(identity.user_id)
        .await
        .db_err("Failed to fetch cart items")?;

    Ok(Json(items))
}
