//! Reservation engine
//!
//! The consistency core of the system:
//!
//! - [`availability`] — pure reads deciding which tables are free for a slot
//! - [`manager`] — transactional booking, editing, deletion, pre-orders
//! - [`cache`] — short-TTL zone summary cache (advisory, never authoritative)
//! - [`error`] — the typed failure taxonomy
//!
//! Invariants owned here: no two confirmed reservations share a
//! (table, date, time) slot, and every multi-step write is one transaction.

pub mod availability;
pub mod cache;
pub mod error;
pub mod manager;

pub use availability::{AvailableTable, ZoneAvailability, find_available_tables, zone_availability};
pub use cache::AvailabilityCache;
pub use error::ReservationError;
pub use manager::{
    CreateReservation, PreorderSummary, PreorderSummaryLine, ZoneReservationOutcome, add_preorder,
    create_reservation, create_zone_reservation, delete_reservation, preorder_summary,
    update_reservation,
};
