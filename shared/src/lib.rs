//! Shared domain models for the Reserva reservation system
//!
//! This crate holds the serializable entities and payload types used by the
//! server and by API clients. It carries no I/O of its own; enable the `db`
//! feature to derive `sqlx::FromRow`/`sqlx::Type` on the entities.

pub mod models;
pub mod util;

pub use models::{
    Dish, DishCreate, DishUpdate, DiningTable, DiningTableCreate, DiningTableUpdate,
    PreorderInput, PreorderLine, Reservation, ReservationStatus, ReservationUpdate, TableStatus,
    Zone, ZoneCreate, ZoneUpdate,
};
