//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, zone_id, status, pos_x, pos_y FROM dining_table ORDER BY zone_id, number",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_zone(pool: &SqlitePool, zone_id: i64) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, zone_id, status, pos_x, pos_y FROM dining_table WHERE zone_id = ? ORDER BY number",
    )
    .bind(zone_id)
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, zone_id, status, pos_x, pos_y FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    if data.capacity <= 0 {
        return Err(RepoError::Validation(
            "Table capacity must be positive".into(),
        ));
    }
    let status = data.status.unwrap_or(TableStatus::Available);
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dining_table (number, capacity, zone_id, status, pos_x, pos_y) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.number)
    .bind(data.capacity)
    .bind(data.zone_id)
    .bind(status)
    .bind(data.pos_x)
    .bind(data.pos_y)
    .fetch_one(pool)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => RepoError::Duplicate(format!(
            "Table {} already exists in this zone",
            data.number
        )),
        _ => RepoError::from(e),
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
    if let Some(capacity) = data.capacity
        && capacity <= 0
    {
        return Err(RepoError::Validation(
            "Table capacity must be positive".into(),
        ));
    }
    let rows = sqlx::query(
        "UPDATE dining_table SET number = COALESCE(?1, number), capacity = COALESCE(?2, capacity), zone_id = COALESCE(?3, zone_id), status = COALESCE(?4, status), pos_x = COALESCE(?5, pos_x), pos_y = COALESCE(?6, pos_y) WHERE id = ?7",
    )
    .bind(data.number)
    .bind(data.capacity)
    .bind(data.zone_id)
    .bind(data.status)
    .bind(data.pos_x)
    .bind(data.pos_y)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            RepoError::Duplicate("Table number already exists in this zone".into())
        }
        _ => RepoError::from(e),
    })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

/// Hard delete a table. Refused while any non-cancelled reservation points at
/// it, matching the admin workflow's expectations.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation WHERE table_id = ? AND status != 'cancelled'",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    if count > 0 {
        return Err(RepoError::Validation(format!(
            "Cannot delete table with {count} active reservations"
        )));
    }
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }
    Ok(true)
}
