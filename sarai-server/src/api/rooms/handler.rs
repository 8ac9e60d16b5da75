//! Room API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, room};
use crate::utils::{AppError, AppResult, ok, ok_with_message};
use shared::models::{Room, RoomCreate, RoomFilter, RoomPatch, RoomStats};
use shared::{ApiResponse, ErrorCode};

/// GET /api/rooms - 房间列表
///
/// 访客强制只看可见房间；员工可通过 filter 查询隐藏房间。
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(filter): Query<RoomFilter>,
) -> AppResult<Json<ApiResponse<Vec<Room>>>> {
    let visible_only = !user.is_staff();
    let rooms = room::find_all(state.pool(), &filter, visible_only).await?;
    Ok(ok(rooms))
}

/// GET /api/rooms/:id - 获取单个房间
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let room = room::find_by_id(state.pool(), id)
        .await?
        .filter(|r| user.is_staff() || r.is_visible)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RoomNotFound, format!("Room {id} not found"))
        })?;
    Ok(ok(room))
}

/// GET /api/rooms/buildings - 有可见房间的楼栋列表
pub async fn buildings(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    Ok(ok(room::buildings(state.pool()).await?))
}

#[derive(Debug, Deserialize)]
pub struct FloorsQuery {
    pub building: String,
}

/// GET /api/rooms/floors?building= - 楼栋内的楼层列表
pub async fn floors(
    State(state): State<ServerState>,
    Query(query): Query<FloorsQuery>,
) -> AppResult<Json<ApiResponse<Vec<i64>>>> {
    Ok(ok(room::floors(state.pool(), &query.building).await?))
}

/// GET /api/rooms/stats - 房间占用统计
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<RoomStats>>> {
    Ok(ok(room::stats(state.pool()).await?))
}

/// POST /api/rooms - 创建房间 (员工)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoomCreate>,
) -> AppResult<Json<ApiResponse<Room>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    match room::create(state.pool(), payload).await {
        Ok(room) => Ok(ok(room)),
        Err(RepoError::Duplicate(msg)) => {
            Err(AppError::with_message(ErrorCode::RoomNumberExists, msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/rooms/:id - 更新房间 (员工)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoomPatch>,
) -> AppResult<Json<ApiResponse<Room>>> {
    match room::update(state.pool(), id, payload).await {
        Ok(room) => Ok(ok(room)),
        Err(RepoError::NotFound(msg)) => Err(AppError::with_message(ErrorCode::RoomNotFound, msg)),
        Err(RepoError::Duplicate(msg)) => {
            Err(AppError::with_message(ErrorCode::RoomNumberExists, msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/rooms/:id - 删除房间 (员工)
///
/// 有在住分配的房间拒绝删除。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    match room::delete(state.pool(), id).await {
        Ok(true) => Ok(ok_with_message(true, "Room deleted")),
        Ok(false) => Err(AppError::with_message(
            ErrorCode::RoomNotFound,
            format!("Room {id} not found"),
        )),
        Err(RepoError::Conflict(msg)) => {
            Err(AppError::with_message(ErrorCode::RoomHasActiveAssignment, msg))
        }
        Err(e) => Err(e.into()),
    }
}
