//! Reports API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::reports::{self, DashboardStats, PeriodReportRow};
use crate::utils::AppResult;

/// 时段报表参数 (闭区间)
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub from: String,
    pub to: String,
}

/// GET /api/reports/dashboard - 当前运营概览
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let stats = reports::dashboard(state.pool()).await?;
    Ok(Json(stats))
}

/// GET /api/reports/period?from=&to= - 按日汇总报表
pub async fn period(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<PeriodReportRow>>> {
    let rows = reports::period_report(state.pool(), &query.from, &query.to).await?;
    Ok(Json(rows))
}
