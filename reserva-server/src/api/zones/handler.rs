//! Zone API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{dining_table as table_repo, zone as zone_repo};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{DiningTable, Zone, ZoneCreate, ZoneUpdate};

/// GET /api/zones - 获取所有区域
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Zone>>> {
    let zones = zone_repo::find_all(state.pool()).await?;
    Ok(Json(zones))
}

/// GET /api/zones/:id - 获取单个区域
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Zone>> {
    let zone = zone_repo::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Zone {} not found", id)))?;
    Ok(Json(zone))
}

/// POST /api/zones - 创建区域
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ZoneCreate>,
) -> AppResult<Json<Zone>> {
    validate_required_text(&payload.name, "Zone name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "Zone description", MAX_NOTE_LEN)?;
    let zone = zone_repo::create(state.pool(), payload).await?;
    Ok(Json(zone))
}

/// PUT /api/zones/:id - 更新区域
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ZoneUpdate>,
) -> AppResult<Json<Zone>> {
    validate_optional_text(&payload.name, "Zone name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "Zone description", MAX_NOTE_LEN)?;
    let zone = zone_repo::update(state.pool(), id, payload).await?;
    Ok(Json(zone))
}

/// DELETE /api/zones/:id - 删除区域 (还有桌台时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = zone_repo::delete(state.pool(), id).await?;
    Ok(Json(result))
}

/// GET /api/zones/:id/tables - 获取区域内的所有桌台
pub async fn list_tables(
    State(state): State<ServerState>,
    Path(zone_id): Path<i64>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = table_repo::find_by_zone(state.pool(), zone_id).await?;
    Ok(Json(tables))
}
