//! Availability API 模块 - 公开的空位查询接口

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/availability", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_tables))
        .route("/zones", get(handler::list_zones))
}
