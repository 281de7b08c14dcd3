//! Availability Resolver
//!
//! Pure reads: which tables are free for a (date, time, party size), and the
//! zone-level projections derived from that set. Results are advisory — the
//! transaction manager always re-validates against live state, so a caller
//! that "lost the race" between reading here and booking gets a clean
//! `SlotAlreadyReserved` instead of a double booking.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use super::ReservationError;
use crate::utils::time::normalize_slot;

/// A table qualifying for the requested slot
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AvailableTable {
    pub table_id: i64,
    pub number: i64,
    pub capacity: i64,
    pub zone_id: Option<i64>,
    pub zone_name: Option<String>,
}

/// Zone-level projection over the qualifying table set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneAvailability {
    pub zone_id: i64,
    pub zone_name: String,
    pub table_count: i64,
    pub total_capacity: i64,
}

/// Find every table free for the slot.
///
/// A table qualifies iff its capacity seats the party, it is not under
/// maintenance, the zone matches when given, and no **confirmed** reservation
/// holds the exact (date, time) slot. Cancelled and pending reservations do
/// not block: pending holds are bumpable by policy.
pub async fn find_available_tables(
    pool: &SqlitePool,
    date: &str,
    time: &str,
    party_size: i64,
    zone_id: Option<i64>,
) -> Result<Vec<AvailableTable>, ReservationError> {
    if party_size <= 0 {
        return Err(ReservationError::InvalidInput(format!(
            "Party size must be positive, got {party_size}"
        )));
    }
    let (date, time) = normalize_slot(date, time)?;

    let tables = sqlx::query_as::<_, AvailableTable>(
        "SELECT t.id AS table_id, t.number, t.capacity, t.zone_id, z.name AS zone_name \
         FROM dining_table t \
         LEFT JOIN zone z ON z.id = t.zone_id \
         WHERE t.capacity >= ?1 \
           AND t.status != 'maintenance' \
           AND (?2 IS NULL OR t.zone_id = ?2) \
           AND NOT EXISTS (\
               SELECT 1 FROM reservation r \
               WHERE r.table_id = t.id AND r.date = ?3 AND r.time = ?4 AND r.status = 'confirmed') \
         ORDER BY t.capacity, t.number",
    )
    .bind(party_size)
    .bind(zone_id)
    .bind(&date)
    .bind(&time)
    .fetch_all(pool)
    .await?;

    Ok(tables)
}

/// Per-zone availability summary for the slot.
///
/// Computed as a projection over [`find_available_tables`] output — never
/// sourced independently, so the two views cannot disagree.
pub async fn zone_availability(
    pool: &SqlitePool,
    date: &str,
    time: &str,
    party_size: i64,
) -> Result<Vec<ZoneAvailability>, ReservationError> {
    let tables = find_available_tables(pool, date, time, party_size, None).await?;

    let mut zones: BTreeMap<i64, ZoneAvailability> = BTreeMap::new();
    for table in tables {
        let (Some(zone_id), Some(zone_name)) = (table.zone_id, table.zone_name) else {
            continue; // unzoned tables have no zone projection
        };
        let entry = zones.entry(zone_id).or_insert_with(|| ZoneAvailability {
            zone_id,
            zone_name,
            table_count: 0,
            total_capacity: 0,
        });
        entry.table_count += 1;
        entry.total_capacity += table.capacity;
    }

    Ok(zones.into_values().collect())
}
