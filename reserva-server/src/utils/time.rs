//! Slot parsing helpers
//!
//! Reservations key on a (date, time) slot stored as text. All parsing and
//! normalization happens here so `2024-6-1`-style sloppy input never reaches
//! the database, where it would defeat the exact-match conflict index.

use chrono::{NaiveDate, NaiveTime};

use crate::reservations::ReservationError;

/// Parse and normalize a calendar date (`YYYY-MM-DD`)
pub fn parse_date(date: &str) -> Result<NaiveDate, ReservationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ReservationError::InvalidInput(format!("Invalid date: {date}")))
}

/// Parse a wall-clock time, accepting `HH:MM` or `HH:MM:SS`
pub fn parse_time(time: &str) -> Result<NaiveTime, ReservationError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| ReservationError::InvalidInput(format!("Invalid time: {time}")))
}

/// Normalize a slot to canonical `(YYYY-MM-DD, HH:MM)` text form
pub fn normalize_slot(date: &str, time: &str) -> Result<(String, String), ReservationError> {
    let d = parse_date(date)?;
    let t = parse_time(time)?;
    Ok((d.format("%Y-%m-%d").to_string(), t.format("%H:%M").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_seconds_away() {
        let (d, t) = normalize_slot("2024-06-01", "19:00:00").unwrap();
        assert_eq!(d, "2024-06-01");
        assert_eq!(t, "19:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_slot("June 1st", "19:00").is_err());
        assert!(normalize_slot("2024-06-01", "7pm").is_err());
        assert!(normalize_slot("2024-13-40", "19:00").is_err());
    }
}
