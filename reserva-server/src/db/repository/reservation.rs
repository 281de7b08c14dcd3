//! Reservation Repository (read side)
//!
//! Read-only reservation queries. All writes go through the transaction
//! manager in [`crate::reservations::manager`], which owns the conflict and
//! stock invariants.

use super::RepoResult;
use shared::models::{PreorderLine, Reservation};
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "SELECT id, table_id, customer_id, customer_name, date, time, party_size, status, notes, created_at, updated_at FROM reservation WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(reservation)
}

/// All reservations, newest slot first (admin listing)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id, table_id, customer_id, customer_name, date, time, party_size, status, notes, created_at, updated_at FROM reservation ORDER BY date DESC, time DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

/// Reservations owned by one customer, newest slot first
pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id, table_id, customer_id, customer_name, date, time, party_size, status, notes, created_at, updated_at FROM reservation WHERE customer_id = ? ORDER BY date DESC, time DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

/// Pre-order lines for a reservation, with dish names for display
pub async fn find_preorders(pool: &SqlitePool, reservation_id: i64) -> RepoResult<Vec<PreorderLine>> {
    let lines = sqlx::query_as::<_, PreorderLine>(
        "SELECT p.id, p.reservation_id, p.dish_id, p.quantity, p.unit_price, p.released, d.name AS dish_name FROM preorder_line p JOIN dish d ON d.id = p.dish_id WHERE p.reservation_id = ? ORDER BY d.name",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}
