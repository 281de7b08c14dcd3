//! Availability API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::reservations::{AvailableTable, ZoneAvailability, find_available_tables, zone_availability};
use crate::utils::AppResult;
use crate::utils::time::normalize_slot;

/// 空位查询参数
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub time: String,
    pub party_size: i64,
    /// 限定区域 (可选)
    pub zone_id: Option<i64>,
}

/// GET /api/availability - 查询指定时段的空闲桌台
pub async fn list_tables(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<AvailableTable>>> {
    let tables = find_available_tables(
        state.pool(),
        &query.date,
        &query.time,
        query.party_size,
        query.zone_id,
    )
    .await?;
    Ok(Json(tables))
}

/// GET /api/availability/zones - 按区域汇总的空位视图
///
/// 走短 TTL 缓存；缓存键是规范化后的时段，避免 "19:0" 和 "19:00"
/// 命中不同条目。
pub async fn list_zones(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<ZoneAvailability>>> {
    let (date, time) = normalize_slot(&query.date, &query.time)?;

    if let Some(cached) = state.availability_cache.get(&date, &time, query.party_size) {
        return Ok(Json(cached));
    }

    let zones = zone_availability(state.pool(), &date, &time, query.party_size).await?;
    state
        .availability_cache
        .insert(&date, &time, query.party_size, zones.clone());
    Ok(Json(zones))
}
