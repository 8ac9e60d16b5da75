//! Room Assignment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{assignment, user as user_repo};
use crate::services::assignment::{CheckInOutcome, CheckOutOutcome};
use crate::utils::{AppError, AppResult, ok};
use shared::models::{AssignmentCreate, AssignmentWithGuest, RoomAssignment};
use shared::{ApiResponse, ErrorCode};

fn assignment_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::AssignmentNotFound,
        format!("Assignment {id} not found"),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentListQuery {
    #[serde(default)]
    pub active_only: bool,
}

/// GET /api/room-assignments - 台账列表 (员工)，附带住客信息
///
/// 住客资料查询失败只降级为 None，不影响台账本身的返回。
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AssignmentListQuery>,
) -> AppResult<Json<ApiResponse<Vec<AssignmentWithGuest>>>> {
    let assignments = assignment::find_all(state.pool(), query.active_only).await?;

    let mut enriched = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let user = user_repo::find_by_id(state.pool(), assignment.user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Guest profile lookup failed for assignment {}: {e}", assignment.id);
                None
            });
        enriched.push(AssignmentWithGuest { assignment, user });
    }
    Ok(ok(enriched))
}

/// GET /api/room-assignments/:id - 获取单个分配 (属主或员工)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RoomAssignment>>> {
    let assignment = assignment::find_by_id(state.pool(), id)
        .await?
        .filter(|a| user.can_access_user(a.user_id))
        .ok_or_else(|| assignment_not_found(id))?;
    Ok(ok(assignment))
}

/// GET /api/room-assignments/user/:user_id - 某住客的分配记录 (本人或员工)
pub async fn list_for_user(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<RoomAssignment>>>> {
    if !user.can_access_user(user_id) {
        return Err(AppError::new(ErrorCode::PermissionDenied));
    }
    let assignments = assignment::find_by_user(state.pool(), user_id).await?;
    Ok(ok(assignments))
}

/// POST /api/room-assignments - 直接分配房间 (员工)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AssignmentCreate>,
) -> AppResult<Json<ApiResponse<RoomAssignment>>> {
    let assignment = crate::services::assignment::assign(state.pool(), payload, user.id).await?;
    Ok(ok(assignment))
}

/// PUT /api/room-assignments/:id/check-in - 办理入住 (员工)
///
/// 入住成功即签发住宿窗口内的餐券；签发失败不回滚入住。
pub async fn check_in(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<CheckInOutcome>>> {
    let outcome = crate::services::assignment::check_in(state.pool(), id, user.id).await?;
    Ok(ok(outcome))
}

/// PUT /api/room-assignments/:id/check-out - 办理退房 (员工)
///
/// 退房释放房间并回收该住客所有未使用餐券。
pub async fn check_out(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<CheckOutOutcome>>> {
    let outcome = crate::services::assignment::check_out(state.pool(), id).await?;
    Ok(ok(outcome))
}
