//! Dish Repository
//!
//! CRUD for the menu catalog. Stock mutations are NOT here — they go through
//! the stock ledger (`crate::stock`), which owns `stock_available`.

use super::{RepoError, RepoResult};
use shared::models::{Dish, DishCreate, DishUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Dish>> {
    let dishes = sqlx::query_as::<_, Dish>(
        "SELECT id, name, description, price, category, stock_available, stock_max, is_available FROM dish ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(dishes)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Dish>> {
    let dish = sqlx::query_as::<_, Dish>(
        "SELECT id, name, description, price, category, stock_available, stock_max, is_available FROM dish WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(dish)
}

pub async fn create(pool: &SqlitePool, data: DishCreate) -> RepoResult<Dish> {
    if data.price < 0.0 {
        return Err(RepoError::Validation("Dish price cannot be negative".into()));
    }
    let stock = data.stock_available.unwrap_or(0);
    if stock < 0 {
        return Err(RepoError::Validation("Dish stock cannot be negative".into()));
    }
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dish (name, description, price, category, stock_available, stock_max, is_available) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(stock)
    .bind(data.stock_max.unwrap_or(100))
    .bind(data.is_available.unwrap_or(true))
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dish".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DishUpdate) -> RepoResult<Dish> {
    if let Some(price) = data.price
        && price < 0.0
    {
        return Err(RepoError::Validation("Dish price cannot be negative".into()));
    }
    let rows = sqlx::query(
        "UPDATE dish SET name = COALESCE(?1, name), description = COALESCE(?2, description), price = COALESCE(?3, price), category = COALESCE(?4, category), stock_max = COALESCE(?5, stock_max), is_available = COALESCE(?6, is_available) WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(data.stock_max)
    .bind(data.is_available)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dish {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    // Pre-order lines keep history; refuse deletion while any reference it
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM preorder_line WHERE dish_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Err(RepoError::Validation(
            "Cannot delete dish referenced by pre-orders; mark it unavailable instead".into(),
        ));
    }
    let rows = sqlx::query("DELETE FROM dish WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dish {id} not found")));
    }
    Ok(true)
}
