//! Reporting/Query Layer
//!
//! Read-only projections over the committed reservation/table/dish state for
//! the admin dashboard and period reports. Nothing here mutates anything.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::repository::RepoResult;
use crate::utils::time::parse_date;
use crate::reservations::ReservationError;

/// Occupancy dashboard counters
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DashboardStats {
    pub total_reservations: i64,
    pub confirmed_reservations: i64,
    pub cancelled_reservations: i64,
    pub reservations_today: i64,
    /// Guests across confirmed reservations
    pub total_guests: i64,
    pub total_tables: i64,
    pub available_tables: i64,
    pub occupied_tables: i64,
    pub reserved_tables: i64,
    pub maintenance_tables: i64,
}

/// One day of a period report
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PeriodReportRow {
    pub date: String,
    pub total_reservations: i64,
    pub confirmed_reservations: i64,
    pub cancelled_reservations: i64,
    pub total_guests: i64,
    pub avg_party_size: f64,
    /// Distinct zones with at least one reservation that day
    pub zones_used: i64,
}

/// Dashboard counters over the current committed state
pub async fn dashboard(pool: &SqlitePool) -> RepoResult<DashboardStats> {
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let stats = sqlx::query_as::<_, DashboardStats>(
        "SELECT \
           (SELECT COUNT(*) FROM reservation) AS total_reservations, \
           (SELECT COUNT(*) FROM reservation WHERE status = 'confirmed') AS confirmed_reservations, \
           (SELECT COUNT(*) FROM reservation WHERE status = 'cancelled') AS cancelled_reservations, \
           (SELECT COUNT(*) FROM reservation WHERE date = ?1) AS reservations_today, \
           (SELECT COALESCE(SUM(party_size), 0) FROM reservation WHERE status = 'confirmed') AS total_guests, \
           (SELECT COUNT(*) FROM dining_table) AS total_tables, \
           (SELECT COUNT(*) FROM dining_table WHERE status = 'available') AS available_tables, \
           (SELECT COUNT(*) FROM dining_table WHERE status = 'occupied') AS occupied_tables, \
           (SELECT COUNT(*) FROM dining_table WHERE status = 'reserved') AS reserved_tables, \
           (SELECT COUNT(*) FROM dining_table WHERE status = 'maintenance') AS maintenance_tables",
    )
    .bind(&today)
    .fetch_one(pool)
    .await?;
    Ok(stats)
}

/// Daily aggregates between two dates (inclusive)
pub async fn period_report(
    pool: &SqlitePool,
    from: &str,
    to: &str,
) -> Result<Vec<PeriodReportRow>, ReservationError> {
    let from = parse_date(from)?.format("%Y-%m-%d").to_string();
    let to = parse_date(to)?.format("%Y-%m-%d").to_string();
    if from > to {
        return Err(ReservationError::InvalidInput(format!(
            "Report range is inverted: {from} > {to}"
        )));
    }

    let rows = sqlx::query_as::<_, PeriodReportRow>(
        "SELECT r.date, \
                COUNT(*) AS total_reservations, \
                SUM(CASE WHEN r.status = 'confirmed' THEN 1 ELSE 0 END) AS confirmed_reservations, \
                SUM(CASE WHEN r.status = 'cancelled' THEN 1 ELSE 0 END) AS cancelled_reservations, \
                COALESCE(SUM(CASE WHEN r.status = 'confirmed' THEN r.party_size ELSE 0 END), 0) AS total_guests, \
                AVG(CAST(r.party_size AS REAL)) AS avg_party_size, \
                COUNT(DISTINCT t.zone_id) AS zones_used \
         FROM reservation r \
         JOIN dining_table t ON t.id = r.table_id \
         WHERE r.date >= ?1 AND r.date <= ?2 \
         GROUP BY r.date \
         ORDER BY r.date",
    )
    .bind(&from)
    .bind(&to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
