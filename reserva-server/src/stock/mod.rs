//! Stock Ledger
//!
//! Sole owner of `dish.stock_available`. Every mutation is a single atomic
//! conditional UPDATE — never read-then-write — so concurrent pre-orders for
//! the same dish can never jointly overdraw stock. The connection-level
//! helpers take `&mut SqliteConnection` so the reservation manager's
//! decrements join its transaction and roll back with it.

use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

use crate::reservations::ReservationError;
use shared::models::Dish;

/// How to apply a stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAdjustMode {
    /// Subtract, failing when the remaining stock would go negative
    Decrement,
    /// Add unconditionally (restock, cancellation release).
    /// `stock_max` is advisory metadata, not a ceiling.
    Increment,
}

/// Atomically subtract `quantity`, guarded by `stock_available >= quantity`.
///
/// Returns the new stock level. The guard and the subtraction are one SQL
/// statement, so two concurrent decrements serialize on the row and the
/// second sees the first's result.
pub async fn decrement(
    conn: &mut SqliteConnection,
    dish_id: i64,
    quantity: i64,
) -> Result<i64, ReservationError> {
    if quantity <= 0 {
        return Err(ReservationError::InvalidInput(format!(
            "Quantity must be positive, got {quantity}"
        )));
    }

    let new_stock: Option<i64> = sqlx::query_scalar(
        "UPDATE dish SET stock_available = stock_available - ?1 WHERE id = ?2 AND stock_available >= ?1 RETURNING stock_available",
    )
    .bind(quantity)
    .bind(dish_id)
    .fetch_optional(&mut *conn)
    .await?;

    match new_stock {
        Some(stock) => Ok(stock),
        None => {
            // Distinguish "no such dish" from "not enough stock"
            let dish: Option<(String, i64)> =
                sqlx::query_as("SELECT name, stock_available FROM dish WHERE id = ?")
                    .bind(dish_id)
                    .fetch_optional(&mut *conn)
                    .await?;
            match dish {
                Some((name, available)) => Err(ReservationError::InsufficientStock {
                    dish_id,
                    dish_name: name,
                    requested: quantity,
                    available,
                }),
                None => Err(ReservationError::DishNotFound(dish_id)),
            }
        }
    }
}

/// Unconditionally add `quantity` back (restock / cancellation release)
pub async fn increment(
    conn: &mut SqliteConnection,
    dish_id: i64,
    quantity: i64,
) -> Result<i64, ReservationError> {
    if quantity <= 0 {
        return Err(ReservationError::InvalidInput(format!(
            "Quantity must be positive, got {quantity}"
        )));
    }

    let new_stock: Option<i64> = sqlx::query_scalar(
        "UPDATE dish SET stock_available = stock_available + ?1 WHERE id = ?2 RETURNING stock_available",
    )
    .bind(quantity)
    .bind(dish_id)
    .fetch_optional(&mut *conn)
    .await?;

    new_stock.ok_or(ReservationError::DishNotFound(dish_id))
}

/// Pool-level adjust entry point (admin restock, bulk import)
pub async fn adjust_stock(
    pool: &SqlitePool,
    dish_id: i64,
    quantity: i64,
    mode: StockAdjustMode,
) -> Result<i64, ReservationError> {
    let mut conn = pool.acquire().await?;
    match mode {
        StockAdjustMode::Decrement => decrement(&mut conn, dish_id, quantity).await,
        StockAdjustMode::Increment => increment(&mut conn, dish_id, quantity).await,
    }
}

/// Dishes currently purchasable: availability flag set AND stock remaining,
/// ordered by category then name.
pub async fn get_available_menu(pool: &SqlitePool) -> Result<Vec<Dish>, ReservationError> {
    let dishes = sqlx::query_as::<_, Dish>(
        "SELECT id, name, description, price, category, stock_available, stock_max, is_available FROM dish WHERE is_available = 1 AND stock_available > 0 ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(dishes)
}
