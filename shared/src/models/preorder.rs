//! Pre-order Model (dish quantities attached to a reservation)

use serde::{Deserialize, Serialize};

/// Persisted pre-order line
///
/// `unit_price` is captured at booking time so later menu edits do not change
/// what the customer was quoted. `released` marks lines whose stock was given
/// back on cancellation, so a release never runs twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PreorderLine {
    pub id: i64,
    pub reservation_id: i64,
    pub dish_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub released: bool,

    // Populated by join queries for display
    #[cfg_attr(feature = "db", sqlx(default))]
    #[serde(default)]
    pub dish_name: Option<String>,
}

/// Pre-order line as submitted by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreorderInput {
    pub dish_id: i64,
    pub quantity: i64,
}
