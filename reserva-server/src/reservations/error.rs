//! Reservation engine errors
//!
//! Every invariant violation surfaces as a typed error carrying enough
//! context (table, dish, slot) for the caller to act. Nothing is swallowed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Table {0} not found")]
    TableNotFound(i64),

    #[error("Dish {0} not found")]
    DishNotFound(i64),

    #[error("Zone {0} not found")]
    ZoneNotFound(i64),

    #[error("Reservation {0} not found")]
    ReservationNotFound(i64),

    /// Lost the booking race (or the table left service between the
    /// availability read and the write). The caller should re-query
    /// availability and retry with user confirmation, never auto-retry.
    #[error("Table {table_id} is no longer available for {date} {time}")]
    SlotAlreadyReserved {
        table_id: i64,
        date: String,
        time: String,
    },

    #[error("Insufficient stock for '{dish_name}': requested {requested}, available {available}")]
    InsufficientStock {
        dish_id: i64,
        dish_name: String,
        requested: i64,
        available: i64,
    },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Store/connectivity failure — never partially applied, safe to retry
    #[error("Store error: {0}")]
    Store(String),
}

impl ReservationError {
    /// Stable machine-readable code, used in per-table batch outcomes
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::TableNotFound(_) => "table_not_found",
            Self::DishNotFound(_) => "dish_not_found",
            Self::ZoneNotFound(_) => "zone_not_found",
            Self::ReservationNotFound(_) => "reservation_not_found",
            Self::SlotAlreadyReserved { .. } => "slot_already_reserved",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::Unauthorized(_) => "unauthorized",
            Self::Store(_) => "store_error",
        }
    }
}

impl From<sqlx::Error> for ReservationError {
    fn from(err: sqlx::Error) -> Self {
        ReservationError::Store(err.to_string())
    }
}

impl From<crate::db::repository::RepoError> for ReservationError {
    fn from(err: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match err {
            RepoError::NotFound(msg) | RepoError::Validation(msg) => {
                ReservationError::InvalidInput(msg)
            }
            RepoError::Duplicate(msg) => ReservationError::InvalidInput(msg),
            RepoError::Database(msg) => ReservationError::Store(msg),
        }
    }
}
