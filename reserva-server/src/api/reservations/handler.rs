//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::reservations::{
    CreateReservation, PreorderSummary, ZoneReservationOutcome, add_preorder, create_reservation,
    create_zone_reservation, delete_reservation, manager, update_reservation,
};
use crate::db::repository::reservation as reservation_repo;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{PreorderInput, PreorderLine, Reservation, ReservationUpdate};

/// 整区预订请求
#[derive(Debug, Deserialize)]
pub struct ZoneReservationRequest {
    pub zone_id: i64,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub preorder_lines: Vec<PreorderInput>,
}

/// GET /api/reservations - 列出预订
///
/// 管理员看到全部；普通用户只看到自己的
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = if current_user.is_admin() {
        reservation_repo::find_all(state.pool()).await?
    } else {
        reservation_repo::find_by_customer(state.pool(), current_user.id).await?
    };
    Ok(Json(reservations))
}

/// GET /api/reservations/mine - 只看自己的预订 (管理员也一样)
pub async fn list_mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations =
        reservation_repo::find_by_customer(state.pool(), current_user.id).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 单个预订 (含预点菜明细)
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = manager::load_with_preorders(state.pool(), id).await?;
    if !current_user.is_admin() && reservation.customer_id != current_user.id {
        return Err(AppError::forbidden(
            "Only the owner or an admin may view this reservation",
        ));
    }
    Ok(Json(reservation))
}

/// POST /api/reservations - 创建预订 (原子性，含预点菜)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CreateReservation>,
) -> AppResult<Json<Reservation>> {
    validate_optional_text(&payload.notes, "Reservation notes", MAX_NOTE_LEN)?;
    let reservation = create_reservation(state.pool(), &current_user, payload).await?;
    Ok(Json(reservation))
}

/// POST /api/reservations/zone - 整区批量预订 (每桌独立成败)
pub async fn create_zone(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ZoneReservationRequest>,
) -> AppResult<Json<Vec<ZoneReservationOutcome>>> {
    validate_optional_text(&payload.notes, "Reservation notes", MAX_NOTE_LEN)?;
    let outcomes = create_zone_reservation(
        state.pool(),
        &current_user,
        payload.zone_id,
        &payload.date,
        &payload.time,
        payload.notes,
        payload.preorder_lines,
    )
    .await?;
    Ok(Json(outcomes))
}

/// PUT /api/reservations/:id - 更新预订 (改期、取消等)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    validate_optional_text(&payload.notes, "Reservation notes", MAX_NOTE_LEN)?;
    let reservation = update_reservation(state.pool(), &current_user, id, payload).await?;
    Ok(Json(reservation))
}

/// DELETE /api/reservations/:id - 删除预订 (硬删除，不回补库存)
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    delete_reservation(state.pool(), &current_user, id).await?;
    Ok(ok_with_message(true, "Reservation deleted"))
}

/// GET /api/reservations/:id/preorders - 预点菜明细
pub async fn list_preorders(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PreorderLine>>> {
    let reservation = reservation_repo::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;
    if !current_user.is_admin() && reservation.customer_id != current_user.id {
        return Err(AppError::forbidden(
            "Only the owner or an admin may view this reservation",
        ));
    }
    let lines = reservation_repo::find_preorders(state.pool(), id).await?;
    Ok(Json(lines))
}

/// GET /api/reservations/:id/preorders/summary - 预点菜账单小结
pub async fn preorder_summary(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PreorderSummary>> {
    let reservation = reservation_repo::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;
    if !current_user.is_admin() && reservation.customer_id != current_user.id {
        return Err(AppError::forbidden(
            "Only the owner or an admin may view this reservation",
        ));
    }
    let summary = crate::reservations::preorder_summary(state.pool(), id).await?;
    Ok(Json(summary))
}

/// POST /api/reservations/:id/preorders - 追加预点菜 (检查库存)
pub async fn add_preorder_line(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PreorderInput>,
) -> AppResult<Json<PreorderLine>> {
    let line = add_preorder(state.pool(), &current_user, id, payload).await?;
    Ok(Json(line))
}
