//! Domain models
//!
//! One file per entity, each with its `*Create` / `*Update` payload types.

pub mod dining_table;
pub mod dish;
pub mod preorder;
pub mod reservation;
pub mod zone;

pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
pub use dish::{Dish, DishCreate, DishUpdate};
pub use preorder::{PreorderInput, PreorderLine};
pub use reservation::{Reservation, ReservationStatus, ReservationUpdate};
pub use zone::{Zone, ZoneCreate, ZoneUpdate};
