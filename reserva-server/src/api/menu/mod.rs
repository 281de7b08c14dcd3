//! Menu API 模块 - 公开的可点菜单
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/menu | GET | 当前可预点的菜品 | 无 |

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::stock::get_available_menu;
use crate::utils::AppResult;
use shared::models::Dish;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(menu))
}

/// GET /api/menu - 可售 (is_available 且有库存) 菜品，按分类和名称排序
pub async fn menu(State(state): State<ServerState>) -> AppResult<Json<Vec<Dish>>> {
    let dishes = get_available_menu(state.pool()).await?;
    Ok(Json(dishes))
}
