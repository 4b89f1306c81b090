use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct CartStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub quantity: i64,
}

impl CartStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an item to a user's cart. Returns the cart item ID.
    pub async fn add(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO cart_items (user_id, product_id, quantity) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(product_id)
                .bind(quantity)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// List the items in a user's cart, oldest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<CartItem>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, product_id, user_id, quantity FROM cart_items WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
