//! Reservation Transaction Manager
//!
//! Owns every write to reservations and pre-order lines. Each per-table
//! booking is one SQLite transaction opened with `BEGIN IMMEDIATE`: conflict
//! re-check (via the partial unique slot index), reservation insert, and all
//! pre-order stock decrements commit or roll back together. The zone batch is
//! deliberately NOT one transaction across tables — per-table results are
//! reported individually.

use serde::{Deserialize, Serialize};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use super::ReservationError;
use crate::auth::CurrentUser;
use crate::db::repository::reservation as reservation_repo;
use crate::stock;
use crate::utils::time::normalize_slot;
use shared::models::{
    PreorderInput, PreorderLine, Reservation, ReservationStatus, ReservationUpdate,
};
use shared::util::now_millis;

/// Booking request for a single table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservation {
    pub table_id: i64,
    pub date: String,
    pub time: String,
    pub party_size: i64,
    pub notes: Option<String>,
    #[serde(default)]
    pub preorder_lines: Vec<PreorderInput>,
}

/// Per-table result of a zone batch. Partial success is a valid, expected
/// outcome — callers must inspect each entry, never assume all-or-nothing.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneReservationOutcome {
    pub table_id: i64,
    pub number: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

/// Atomically create a confirmed reservation with optional pre-orders.
///
/// All-or-nothing per table: a lost slot race or any insufficient-stock
/// pre-order line aborts the whole transaction, leaving no reservation row
/// and no stock movement.
pub async fn create_reservation(
    pool: &SqlitePool,
    ctx: &CurrentUser,
    req: CreateReservation,
) -> Result<Reservation, ReservationError> {
    if req.party_size <= 0 {
        return Err(ReservationError::InvalidInput(format!(
            "Party size must be positive, got {}",
            req.party_size
        )));
    }
    for line in &req.preorder_lines {
        if line.quantity <= 0 {
            return Err(ReservationError::InvalidInput(format!(
                "Pre-order quantity must be positive, got {}",
                line.quantity
            )));
        }
    }
    let (date, time) = normalize_slot(&req.date, &req.time)?;

    let mut conn = begin_immediate(pool).await?;
    let reservation_id = match book_table(&mut conn, ctx, &req, &date, &time).await {
        Ok(id) => id,
        Err(e) => {
            rollback(&mut conn).await;
            return Err(e);
        }
    };
    commit(&mut conn).await?;
    drop(conn);

    tracing::info!(
        reservation_id,
        table_id = req.table_id,
        %date,
        %time,
        party_size = req.party_size,
        preorders = req.preorder_lines.len(),
        "Reservation created"
    );

    load_with_preorders(pool, reservation_id).await
}

/// Reserve every table in a zone for the slot — a best-effort batch.
///
/// Each table's booking independently succeeds or fails (atomic per table,
/// non-atomic across the batch) and the caller gets one outcome per table.
/// Pre-order lines are attached only to the first reservation that succeeds.
pub async fn create_zone_reservation(
    pool: &SqlitePool,
    ctx: &CurrentUser,
    zone_id: i64,
    date: &str,
    time: &str,
    notes: Option<String>,
    preorder_lines: Vec<PreorderInput>,
) -> Result<Vec<ZoneReservationOutcome>, ReservationError> {
    let zone_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM zone WHERE id = ?")
        .bind(zone_id)
        .fetch_optional(pool)
        .await?;
    if zone_exists.is_none() {
        return Err(ReservationError::ZoneNotFound(zone_id));
    }
    // Validate the slot once up front so a bad date fails the whole request
    // instead of producing N identical per-table parse errors.
    normalize_slot(date, time)?;

    let tables: Vec<(i64, i64, i64)> = sqlx::query_as(
        "SELECT id, number, capacity FROM dining_table WHERE zone_id = ? ORDER BY number",
    )
    .bind(zone_id)
    .fetch_all(pool)
    .await?;

    let mut outcomes = Vec::with_capacity(tables.len());
    let mut preorders_pending = preorder_lines;

    for (table_id, number, capacity) in tables {
        let req = CreateReservation {
            table_id,
            date: date.to_string(),
            time: time.to_string(),
            // Booking the whole zone: each table is taken at full capacity
            party_size: capacity,
            notes: notes.clone(),
            preorder_lines: std::mem::take(&mut preorders_pending),
        };
        let attempted_preorders = req.preorder_lines.clone();

        match create_reservation(pool, ctx, req).await {
            Ok(reservation) => outcomes.push(ZoneReservationOutcome {
                table_id,
                number,
                success: true,
                reservation_id: Some(reservation.id),
                error: None,
                error_code: None,
            }),
            Err(e) => {
                // This table failed, so its pre-orders were rolled back;
                // carry them to the next table in the batch.
                preorders_pending = attempted_preorders;
                tracing::warn!(table_id, zone_id, error = %e, "Zone batch: table booking failed");
                outcomes.push(ZoneReservationOutcome {
                    table_id,
                    number,
                    success: false,
                    reservation_id: None,
                    error: Some(e.to_string()),
                    error_code: Some(e.code().to_string()),
                });
            }
        }
    }

    Ok(outcomes)
}

/// Staff/owner edit of date, time, party size, status, or notes.
///
/// Decided policy for the cancellation/stock question: transitioning into
/// `cancelled` releases the reservation's unreleased pre-order stock inside
/// the same transaction. Re-confirming later does NOT re-decrement; staff
/// must re-add pre-orders explicitly.
pub async fn update_reservation(
    pool: &SqlitePool,
    ctx: &CurrentUser,
    id: i64,
    update: ReservationUpdate,
) -> Result<Reservation, ReservationError> {
    let existing = reservation_repo::find_by_id(pool, id)
        .await
        .map_err(|e| ReservationError::Store(e.to_string()))?
        .ok_or(ReservationError::ReservationNotFound(id))?;
    authorize(ctx, existing.customer_id, "update this reservation")?;

    if let Some(party_size) = update.party_size
        && party_size <= 0
    {
        return Err(ReservationError::InvalidInput(format!(
            "Party size must be positive, got {party_size}"
        )));
    }
    // Normalize whichever slot half is changing, keeping the other
    let new_date = update.date.as_deref().unwrap_or(&existing.date);
    let new_time = update.time.as_deref().unwrap_or(&existing.time);
    let (date, time) = normalize_slot(new_date, new_time)?;

    let becomes_cancelled = update.status == Some(ReservationStatus::Cancelled)
        && existing.status != ReservationStatus::Cancelled;

    let mut conn = begin_immediate(pool).await?;
    if let Err(e) =
        apply_update(&mut conn, id, existing.table_id, &update, becomes_cancelled, &date, &time)
            .await
    {
        rollback(&mut conn).await;
        return Err(e);
    }
    commit(&mut conn).await?;
    drop(conn);

    tracing::info!(reservation_id = id, cancelled = becomes_cancelled, "Reservation updated");
    load_with_preorders(pool, id).await
}

/// Hard delete — irreversible, admin or owner only.
///
/// Cascade removes the pre-order lines but does NOT release stock (explicit
/// non-goal; cancellation is the path that gives stock back).
pub async fn delete_reservation(
    pool: &SqlitePool,
    ctx: &CurrentUser,
    id: i64,
) -> Result<(), ReservationError> {
    let existing = reservation_repo::find_by_id(pool, id)
        .await
        .map_err(|e| ReservationError::Store(e.to_string()))?
        .ok_or(ReservationError::ReservationNotFound(id))?;
    authorize(ctx, existing.customer_id, "delete this reservation")?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    // Give the floor plan its table back
    sqlx::query("UPDATE dining_table SET status = 'available' WHERE id = ? AND status = 'reserved'")
        .bind(existing.table_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(reservation_id = id, table_id = existing.table_id, "Reservation deleted");
    Ok(())
}

/// Attach a pre-order line to an existing reservation (stock-checked)
pub async fn add_preorder(
    pool: &SqlitePool,
    ctx: &CurrentUser,
    reservation_id: i64,
    input: PreorderInput,
) -> Result<PreorderLine, ReservationError> {
    let existing = reservation_repo::find_by_id(pool, reservation_id)
        .await
        .map_err(|e| ReservationError::Store(e.to_string()))?
        .ok_or(ReservationError::ReservationNotFound(reservation_id))?;
    authorize(ctx, existing.customer_id, "modify this reservation")?;
    if existing.status == ReservationStatus::Cancelled {
        return Err(ReservationError::InvalidInput(
            "Cannot add pre-orders to a cancelled reservation".into(),
        ));
    }
    if input.quantity <= 0 {
        return Err(ReservationError::InvalidInput(format!(
            "Pre-order quantity must be positive, got {}",
            input.quantity
        )));
    }

    let mut conn = begin_immediate(pool).await?;
    let line_id = match insert_preorder_line(&mut conn, reservation_id, &input).await {
        Ok(id) => id,
        Err(e) => {
            rollback(&mut conn).await;
            return Err(e);
        }
    };
    commit(&mut conn).await?;
    drop(conn);

    let line = sqlx::query_as::<_, PreorderLine>(
        "SELECT p.id, p.reservation_id, p.dish_id, p.quantity, p.unit_price, p.released, d.name AS dish_name FROM preorder_line p JOIN dish d ON d.id = p.dish_id WHERE p.id = ?",
    )
    .bind(line_id)
    .fetch_one(pool)
    .await?;
    Ok(line)
}

/// Load a reservation with its pre-order lines attached
pub async fn load_with_preorders(
    pool: &SqlitePool,
    id: i64,
) -> Result<Reservation, ReservationError> {
    let mut reservation = reservation_repo::find_by_id(pool, id)
        .await
        .map_err(|e| ReservationError::Store(e.to_string()))?
        .ok_or(ReservationError::ReservationNotFound(id))?;
    reservation.preorders = reservation_repo::find_preorders(pool, id)
        .await
        .map_err(|e| ReservationError::Store(e.to_string()))?;
    Ok(reservation)
}

/// One priced line of a pre-order summary
#[derive(Debug, Clone, Serialize)]
pub struct PreorderSummaryLine {
    pub dish_id: i64,
    pub dish_name: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Itemized bill preview for a reservation's pre-orders
#[derive(Debug, Clone, Serialize)]
pub struct PreorderSummary {
    pub reservation_id: i64,
    pub lines: Vec<PreorderSummaryLine>,
    pub total_quantity: i64,
    pub total_amount: f64,
}

/// Total a reservation's pre-order lines at their captured unit prices.
///
/// Prices come from the `unit_price` snapshot taken when each line was
/// placed, so later menu price edits never change an existing bill.
pub async fn preorder_summary(
    pool: &SqlitePool,
    id: i64,
) -> Result<PreorderSummary, ReservationError> {
    reservation_repo::find_by_id(pool, id)
        .await
        .map_err(|e| ReservationError::Store(e.to_string()))?
        .ok_or(ReservationError::ReservationNotFound(id))?;
    let lines = reservation_repo::find_preorders(pool, id)
        .await
        .map_err(|e| ReservationError::Store(e.to_string()))?;

    let mut total_quantity = 0;
    let mut total_amount = 0.0;
    let lines = lines
        .into_iter()
        .map(|line| {
            let line_total = line.unit_price * line.quantity as f64;
            total_quantity += line.quantity;
            total_amount += line_total;
            PreorderSummaryLine {
                dish_id: line.dish_id,
                dish_name: line.dish_name,
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total,
            }
        })
        .collect();

    Ok(PreorderSummary {
        reservation_id: id,
        lines,
        total_quantity,
        total_amount,
    })
}

// ── Internals ───────────────────────────────────────────────────────

/// Open a write transaction with `BEGIN IMMEDIATE`.
///
/// The default deferred transaction pins a read snapshot at its first SELECT.
/// If a concurrent writer commits in between, SQLite refuses the later lock
/// upgrade with an instant SQLITE_BUSY that skips `busy_timeout`, and the
/// caller would see an opaque `Store` error instead of a typed one. Taking
/// the write lock up front serializes writers, so the loser of a race runs
/// into the unique slot index or the stock guard and gets the typed error.
async fn begin_immediate(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>, ReservationError> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
    Ok(conn)
}

async fn commit(conn: &mut SqliteConnection) -> Result<(), ReservationError> {
    if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
        rollback(conn).await;
        return Err(e.into());
    }
    Ok(())
}

/// Best-effort rollback; the connection returns to the pool clean either way
async fn rollback(conn: &mut SqliteConnection) {
    if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
        tracing::error!(error = %e, "Transaction rollback failed");
    }
}

/// Booking body for one table. Runs on a connection already holding a write
/// transaction; the caller commits or rolls back.
async fn book_table(
    conn: &mut SqliteConnection,
    ctx: &CurrentUser,
    req: &CreateReservation,
    date: &str,
    time: &str,
) -> Result<i64, ReservationError> {
    // Re-validate the resolver's qualification against live state; the
    // client's availability read may be stale.
    let table: Option<(i64, String)> =
        sqlx::query_as("SELECT capacity, status FROM dining_table WHERE id = ?")
            .bind(req.table_id)
            .fetch_optional(&mut *conn)
            .await?;
    let (capacity, table_status) = table.ok_or(ReservationError::TableNotFound(req.table_id))?;
    if capacity < req.party_size {
        return Err(ReservationError::InvalidInput(format!(
            "Table {} seats {capacity}, party of {} does not fit",
            req.table_id, req.party_size
        )));
    }
    if table_status == "maintenance" {
        return Err(ReservationError::SlotAlreadyReserved {
            table_id: req.table_id,
            date: date.to_string(),
            time: time.to_string(),
        });
    }

    // Insert the confirmed row. The partial unique index on
    // (table_id, date, time) WHERE status = 'confirmed' turns a concurrent
    // double-book into a unique violation here — exactly one writer wins.
    let now = now_millis();
    let reservation_id: i64 = sqlx::query_scalar(
        "INSERT INTO reservation (table_id, customer_id, customer_name, date, time, party_size, status, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 'confirmed', ?, ?, ?) RETURNING id",
    )
    .bind(req.table_id)
    .bind(ctx.id)
    .bind(&ctx.display_name)
    .bind(date)
    .bind(time)
    .bind(req.party_size)
    .bind(&req.notes)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => ReservationError::SlotAlreadyReserved {
            table_id: req.table_id,
            date: date.to_string(),
            time: time.to_string(),
        },
        _ => ReservationError::from(e),
    })?;

    // Pre-order stock decrements join the transaction: any failure here
    // rolls back the reservation row and every earlier decrement.
    for line in &req.preorder_lines {
        insert_preorder_line(&mut *conn, reservation_id, line).await?;
    }

    // Coarse floor-management flag; reservation conflicts never read it
    sqlx::query("UPDATE dining_table SET status = 'reserved' WHERE id = ? AND status = 'available'")
        .bind(req.table_id)
        .execute(&mut *conn)
        .await?;

    Ok(reservation_id)
}

/// Edit body. Same contract as [`book_table`]: caller owns the transaction.
async fn apply_update(
    conn: &mut SqliteConnection,
    id: i64,
    table_id: i64,
    update: &ReservationUpdate,
    becomes_cancelled: bool,
    date: &str,
    time: &str,
) -> Result<(), ReservationError> {
    if becomes_cancelled {
        release_preorder_stock(&mut *conn, id).await?;
    }

    // COALESCE keeps omitted fields. Consequence: notes cannot be cleared to
    // NULL through this path; send an empty string to blank them.
    let now = now_millis();
    sqlx::query(
        "UPDATE reservation SET date = ?1, time = ?2, party_size = COALESCE(?3, party_size), status = COALESCE(?4, status), notes = COALESCE(?5, notes), updated_at = ?6 WHERE id = ?7",
    )
    .bind(date)
    .bind(time)
    .bind(update.party_size)
    .bind(update.status)
    .bind(&update.notes)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(|e| match e.as_database_error() {
        // Moving a confirmed reservation onto an occupied slot trips the
        // same partial unique index as a fresh double-book
        Some(db) if db.is_unique_violation() => ReservationError::SlotAlreadyReserved {
            table_id,
            date: date.to_string(),
            time: time.to_string(),
        },
        _ => ReservationError::from(e),
    })?;
    Ok(())
}

fn authorize(ctx: &CurrentUser, owner_id: i64, action: &str) -> Result<(), ReservationError> {
    if ctx.is_admin() || ctx.id == owner_id {
        Ok(())
    } else {
        Err(ReservationError::Unauthorized(format!(
            "Only the owner or an admin may {action}"
        )))
    }
}

/// Decrement stock and insert the line, all on the caller's transaction
async fn insert_preorder_line(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    line: &PreorderInput,
) -> Result<i64, ReservationError> {
    let dish: Option<(f64, bool)> =
        sqlx::query_as("SELECT price, is_available FROM dish WHERE id = ?")
            .bind(line.dish_id)
            .fetch_optional(&mut *conn)
            .await?;
    let (unit_price, is_available) = dish.ok_or(ReservationError::DishNotFound(line.dish_id))?;
    if !is_available {
        return Err(ReservationError::InvalidInput(format!(
            "Dish {} is not available for pre-order",
            line.dish_id
        )));
    }

    stock::decrement(&mut *conn, line.dish_id, line.quantity).await?;

    let line_id: i64 = sqlx::query_scalar(
        "INSERT INTO preorder_line (reservation_id, dish_id, quantity, unit_price) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(reservation_id)
    .bind(line.dish_id)
    .bind(line.quantity)
    .bind(unit_price)
    .fetch_one(&mut *conn)
    .await?;
    Ok(line_id)
}

/// Give back the stock for every unreleased line, once. Lines are flagged
/// `released` so a second cancellation pass is a no-op.
async fn release_preorder_stock(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<(), ReservationError> {
    let lines: Vec<(i64, i64, i64)> = sqlx::query_as(
        "SELECT id, dish_id, quantity FROM preorder_line WHERE reservation_id = ? AND released = 0",
    )
    .bind(reservation_id)
    .fetch_all(&mut *conn)
    .await?;

    for (line_id, dish_id, quantity) in lines {
        stock::increment(&mut *conn, dish_id, quantity).await?;
        sqlx::query("UPDATE preorder_line SET released = 1 WHERE id = ?")
            .bind(line_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
