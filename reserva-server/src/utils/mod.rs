//! Utility module — common helpers and types
//!
//! - [`AppError`] / [`AppResult`] — application error type and result alias
//! - [`logger`] — tracing setup
//! - [`time`] — slot (date, time) parsing
//! - [`validation`] — text length checks

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;
