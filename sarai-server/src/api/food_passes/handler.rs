//! Meal Pass API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, food_pass};
use crate::utils::{AppError, AppResult, ok, ok_with_message, time};
use shared::models::{FoodPass, FoodPassFilter, FoodPassGenerate, FoodPassPatch, FoodPassScan};
use shared::{ApiResponse, ErrorCode};

#[derive(Debug, Serialize)]
pub struct GenerateOutcome {
    pub passes_issued: u64,
}

/// POST /api/food-passes/generate - 批量签发 (员工)
///
/// 按 (成员 × 三餐 × 日期区间) 展开；重复签发是幂等的。
pub async fn generate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<FoodPassGenerate>,
) -> AppResult<Json<ApiResponse<GenerateOutcome>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let passes_issued =
        crate::services::food_pass::generate(state.pool(), payload, user.id).await?;
    Ok(ok(GenerateOutcome { passes_issued }))
}

/// POST /api/food-passes/scan - 扫码核销 (员工)
///
/// 失败原因 (不存在 / 已使用 / 已过期) 统一为一个错误，
/// 避免扫码端探测券的状态。
pub async fn scan(
    State(state): State<ServerState>,
    Json(payload): Json<FoodPassScan>,
) -> AppResult<Json<ApiResponse<FoodPass>>> {
    let today = time::today_str();
    match food_pass::redeem(state.pool(), payload.pass_id, &today).await {
        Ok(pass) => Ok(ok_with_message(pass, "Pass redeemed")),
        Err(RepoError::Conflict(_)) | Err(RepoError::NotFound(_)) => {
            Err(AppError::new(ErrorCode::PassNotRedeemable))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/food-passes/user/:user_id - 住客的餐券 (本人或员工)
pub async fn list_for_user(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
    Query(filter): Query<FoodPassFilter>,
) -> AppResult<Json<ApiResponse<Vec<FoodPass>>>> {
    if !user.can_access_user(user_id) {
        return Err(AppError::new(ErrorCode::PermissionDenied));
    }
    let passes = food_pass::find_for_user(state.pool(), user_id, &filter).await?;
    Ok(ok(passes))
}

/// PUT /api/food-passes/:id - 修正单张券 (员工)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FoodPassPatch>,
) -> AppResult<Json<ApiResponse<FoodPass>>> {
    if let Some(date) = &payload.date {
        time::parse_date(date)?;
    }

    match food_pass::update(state.pool(), id, payload).await {
        Ok(pass) => Ok(ok(pass)),
        Err(RepoError::NotFound(_)) => Err(AppError::with_message(
            ErrorCode::PassNotFound,
            format!("Pass {id} not found"),
        )),
        Err(e) => Err(e.into()),
    }
}
