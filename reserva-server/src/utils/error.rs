//! Unified Error Handling
//!
//! Application-level error type and the JSON envelope every handler returns.
//!
//! # Error code ranges
//!
//! | Prefix | Category |
//! |--------|----------|
//! | E0xxx  | Business / validation |
//! | E2xxx  | Authorization |
//! | E3xxx  | Authentication |
//! | E9xxx  | System (database, internal) |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;
use crate::reservations::ReservationError;

/// Unified API response structure
///
/// ```json
/// { "code": "E0000", "message": "Success", "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication Errors ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string())
            }
            AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string())
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".to_string())
            }

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Conflict (409) — includes lost booking races; the client should
            // re-query availability and retry with user confirmation
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Business rule (422) — e.g. insufficient stock
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }

            // Database / store errors (503) — never partially applied,
            // safe for the client to retry with backoff
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Conversions ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<ReservationError> for AppError {
    fn from(e: ReservationError) -> Self {
        match &e {
            ReservationError::InvalidInput(_) => AppError::Validation(e.to_string()),
            ReservationError::TableNotFound(_)
            | ReservationError::DishNotFound(_)
            | ReservationError::ZoneNotFound(_)
            | ReservationError::ReservationNotFound(_) => AppError::NotFound(e.to_string()),
            ReservationError::SlotAlreadyReserved { .. } => AppError::Conflict(e.to_string()),
            ReservationError::InsufficientStock { .. } => AppError::BusinessRule(e.to_string()),
            ReservationError::Unauthorized(msg) => AppError::Forbidden(msg.clone()),
            ReservationError::Store(msg) => AppError::Database(msg.clone()),
        }
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let body = ok(vec![1, 2, 3]);
        let value = serde_json::to_value(&body.0).unwrap();
        assert_eq!(value["code"], "E0000");
        assert_eq!(value["message"], "Success");
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn error_envelope_omits_data() {
        let body = AppResponse::<()> {
            code: "E0404".to_string(),
            message: "Resource not found: Zone 9".to_string(),
            data: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("data").is_none());
    }

    #[test]
    fn reservation_errors_map_to_the_right_variant() {
        let conflict = ReservationError::SlotAlreadyReserved {
            table_id: 1,
            date: "2026-09-01".to_string(),
            time: "19:00".to_string(),
        };
        assert!(matches!(AppError::from(conflict), AppError::Conflict(_)));

        let stock = ReservationError::InsufficientStock {
            dish_id: 1,
            dish_name: "Paella".to_string(),
            requested: 4,
            available: 1,
        };
        assert!(matches!(AppError::from(stock), AppError::BusinessRule(_)));
    }
}
