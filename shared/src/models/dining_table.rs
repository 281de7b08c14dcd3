//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Coarse operational status of a table.
///
/// This is a floor-management flag, independent of reservation conflicts: a
/// table can be `Available` today and still hold a confirmed reservation for
/// next week. Only `Maintenance` removes a table from availability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    /// Table number, unique within its zone
    pub number: i64,
    pub capacity: i64,
    pub zone_id: Option<i64>,
    pub status: TableStatus,
    // Floor-plan coordinates (admin UI, advisory only)
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i64,
    pub capacity: i64,
    pub zone_id: Option<i64>,
    pub status: Option<TableStatus>,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub number: Option<i64>,
    pub capacity: Option<i64>,
    pub zone_id: Option<i64>,
    pub status: Option<TableStatus>,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
}
