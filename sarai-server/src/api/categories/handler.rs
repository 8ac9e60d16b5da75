//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{RepoError, category};
use crate::utils::{AppError, AppResult, ok, ok_with_message};
use shared::models::{
    DiningHallCategory, DiningHallCreate, DiningHallPatch, RoomCategory, RoomCategoryCreate,
    RoomCategoryPatch,
};
use shared::{ApiResponse, ErrorCode};

fn category_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
}

fn dining_hall_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::DiningHallNotFound,
        format!("Dining hall {id} not found"),
    )
}

// ---------- Room categories ----------

/// GET /api/categories/rooms - 房型目录
pub async fn list_room_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<RoomCategory>>>> {
    Ok(ok(category::list_room_categories(state.pool()).await?))
}

/// GET /api/categories/rooms/:id
pub async fn get_room_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RoomCategory>>> {
    let found = category::find_room_category(state.pool(), id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(ok(found))
}

/// POST /api/categories/rooms - 新建房型 (超级管理员)
pub async fn create_room_category(
    State(state): State<ServerState>,
    Json(payload): Json<RoomCategoryCreate>,
) -> AppResult<Json<ApiResponse<RoomCategory>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(ok(category::create_room_category(state.pool(), payload).await?))
}

/// PUT /api/categories/rooms/:id - 更新房型 (超级管理员)
pub async fn update_room_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoomCategoryPatch>,
) -> AppResult<Json<ApiResponse<RoomCategory>>> {
    match category::update_room_category(state.pool(), id, payload).await {
        Ok(updated) => Ok(ok(updated)),
        Err(RepoError::NotFound(_)) => Err(category_not_found(id)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/categories/rooms/:id - 删除房型 (超级管理员)
pub async fn delete_room_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    match category::delete_room_category(state.pool(), id).await {
        Ok(()) => Ok(ok_with_message(true, "Room category deleted")),
        Err(RepoError::NotFound(_)) => Err(category_not_found(id)),
        Err(e) => Err(e.into()),
    }
}

// ---------- Dining halls ----------

/// GET /api/categories/dining-halls - 餐厅目录
pub async fn list_dining_halls(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<DiningHallCategory>>>> {
    Ok(ok(category::list_dining_halls(state.pool()).await?))
}

/// GET /api/categories/dining-halls/:id
pub async fn get_dining_hall(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<DiningHallCategory>>> {
    let found = category::find_dining_hall(state.pool(), id)
        .await?
        .ok_or_else(|| dining_hall_not_found(id))?;
    Ok(ok(found))
}

/// POST /api/categories/dining-halls - 新建餐厅 (超级管理员)
pub async fn create_dining_hall(
    State(state): State<ServerState>,
    Json(payload): Json<DiningHallCreate>,
) -> AppResult<Json<ApiResponse<DiningHallCategory>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    match category::create_dining_hall(state.pool(), payload).await {
        Ok(hall) => Ok(ok(hall)),
        Err(RepoError::Validation(msg)) => {
            Err(AppError::with_message(ErrorCode::InvalidColorCode, msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/categories/dining-halls/:id - 更新餐厅 (超级管理员)
pub async fn update_dining_hall(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningHallPatch>,
) -> AppResult<Json<ApiResponse<DiningHallCategory>>> {
    match category::update_dining_hall(state.pool(), id, payload).await {
        Ok(updated) => Ok(ok(updated)),
        Err(RepoError::NotFound(_)) => Err(dining_hall_not_found(id)),
        Err(RepoError::Validation(msg)) => {
            Err(AppError::with_message(ErrorCode::InvalidColorCode, msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/categories/dining-halls/:id - 删除餐厅 (超级管理员)
pub async fn delete_dining_hall(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    match category::delete_dining_hall(state.pool(), id).await {
        Ok(()) => Ok(ok_with_message(true, "Dining hall deleted")),
        Err(RepoError::NotFound(_)) => Err(dining_hall_not_found(id)),
        Err(e) => Err(e.into()),
    }
}
