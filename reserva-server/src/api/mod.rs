//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`availability`] - 空位查询接口 (公开)
//! - [`reservations`] - 预订管理接口
//! - [`menu`] - 公开菜单接口
//! - [`dishes`] - 菜品管理接口 (管理员)
//! - [`zones`] - 区域管理接口
//! - [`tables`] - 桌台管理接口
//! - [`reports`] - 统计报表接口 (管理员)

pub mod health;

pub mod availability;
pub mod dishes;
pub mod menu;
pub mod reports;
pub mod reservations;
pub mod tables;
pub mod zones;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// 组装完整的应用路由
///
/// 认证中间件套在整棵路由树上；公开路径 (健康检查、空位查询、菜单)
/// 在中间件内部放行。
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(availability::router())
        .merge(reservations::router())
        .merge(menu::router())
        .merge(dishes::router())
        .merge(zones::router())
        .merge(tables::router())
        .merge(reports::router())
        // 使用 from_fn_with_state 以便中间件可以访问 ServerState
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
