//! Reservation Model

use serde::{Deserialize, Serialize};

use super::preorder::PreorderLine;

/// Reservation lifecycle status.
///
/// Only `Confirmed` blocks a slot in availability and conflict checks; a
/// `Pending` hold can be bumped by a confirmed booking. This is deliberate
/// policy, not an accident of implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Reservation entity
///
/// The conflict-detection key is the exact `(table_id, date, time)` slot,
/// enforced by a partial unique index over confirmed rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub table_id: i64,
    /// Caller identity from the external identity provider
    pub customer_id: i64,
    pub customer_name: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Wall-clock time, `HH:MM`
    pub time: String,
    pub party_size: i64,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub preorders: Vec<PreorderLine>,
}

/// Staff/owner edit payload
///
/// `None` fields are left unchanged. Notes can therefore not be reset to
/// NULL through an update; send `Some("")` to blank them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub date: Option<String>,
    pub time: Option<String>,
    pub party_size: Option<i64>,
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
        let parsed: ReservationStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, ReservationStatus::Cancelled);
    }

    #[test]
    fn update_accepts_partial_payload() {
        let update: ReservationUpdate =
            serde_json::from_str(r#"{"status": "cancelled"}"#).unwrap();
        assert_eq!(update.status, Some(ReservationStatus::Cancelled));
        assert!(update.date.is_none());
        assert!(update.time.is_none());
    }
}
