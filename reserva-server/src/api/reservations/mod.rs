//! Reservation API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/mine", get(handler::list_mine))
        .route("/zone", post(handler::create_zone))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/preorders",
            get(handler::list_preorders).post(handler::add_preorder_line),
        )
        .route("/{id}/preorders/summary", get(handler::preorder_summary))
}
