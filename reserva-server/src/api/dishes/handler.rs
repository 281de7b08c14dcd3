//! Dish API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::dish as dish_repo;
use crate::stock::{self, StockAdjustMode};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Dish, DishCreate, DishUpdate};

/// GET /api/dishes - 获取所有菜品 (含下架和无库存)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Dish>>> {
    let dishes = dish_repo::find_all(state.pool()).await?;
    Ok(Json(dishes))
}

/// GET /api/dishes/:id - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Dish>> {
    let dish = dish_repo::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {} not found", id)))?;
    Ok(Json(dish))
}

/// POST /api/dishes - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    validate_required_text(&payload.name, "Dish name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "Dish description", MAX_NOTE_LEN)?;
    let dish = dish_repo::create(state.pool(), payload).await?;
    Ok(Json(dish))
}

/// PUT /api/dishes/:id - 更新菜品 (库存只能走 /stock 接口)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    validate_optional_text(&payload.name, "Dish name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "Dish description", MAX_NOTE_LEN)?;
    let dish = dish_repo::update(state.pool(), id, payload).await?;
    Ok(Json(dish))
}

/// DELETE /api/dishes/:id - 删除菜品 (被预点菜引用时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = dish_repo::delete(state.pool(), id).await?;
    Ok(Json(result))
}

/// 库存调整请求
#[derive(Debug, Deserialize)]
pub struct StockAdjustRequest {
    pub quantity: i64,
    pub mode: StockAdjustMode,
}

/// 库存调整结果
#[derive(Debug, Serialize)]
pub struct StockAdjustResponse {
    pub dish_id: i64,
    pub stock_available: i64,
}

/// POST /api/dishes/:id/stock - 调整库存 (补货/核减)
///
/// 核减同样走守卫式 UPDATE，不可能把库存调成负数
pub async fn adjust_stock(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<StockAdjustResponse>> {
    if payload.quantity <= 0 {
        return Err(AppError::validation(format!(
            "Adjustment quantity must be positive, got {}",
            payload.quantity
        )));
    }
    let stock_available =
        stock::adjust_stock(state.pool(), id, payload.quantity, payload.mode).await?;
    Ok(Json(StockAdjustResponse {
        dish_id: id,
        stock_available,
    }))
}
