//! Stay Request API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, assignment, room, room_request, user as user_repo};
use crate::services::assignment::ProcessOutcome;
use crate::utils::{AppError, AppResult, ok, ok_with_message};
use shared::models::{
    PeopleUpdate, ProcessRequest, RoomRequest, RoomRequestAdminPatch, RoomRequestCreate,
    RoomRequestFilter, RoomRequestWithDetails,
};
use shared::{ApiResponse, ErrorCode};

fn request_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::RequestNotFound, format!("Stay request {id} not found"))
}

/// 补全申请的关联信息：申请人资料，以及已分配时的分配记录和房间。
///
/// 查询失败只降级为 None，不影响申请本身的返回。
async fn with_details(state: &ServerState, request: RoomRequest) -> RoomRequestWithDetails {
    let user = user_repo::find_by_id(state.pool(), request.user_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Guest profile lookup failed for request {}: {e}", request.id);
            None
        });
    let assignment = assignment::find_by_request(state.pool(), request.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Assignment lookup failed for request {}: {e}", request.id);
            None
        });
    let room = match &assignment {
        Some(a) => room::find_by_id(state.pool(), a.room_id).await.unwrap_or_else(|e| {
            tracing::warn!("Room lookup failed for assignment {}: {e}", a.id);
            None
        }),
        None => None,
    };
    RoomRequestWithDetails { request, user, assignment, room }
}

/// 加载申请并做属主检查：访客只能访问自己的申请。
async fn load_owned(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
) -> AppResult<RoomRequest> {
    let request = room_request::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| request_not_found(id))?;
    if !user.can_access_user(request.user_id) {
        // 不泄露他人申请的存在
        return Err(request_not_found(id));
    }
    Ok(request)
}

/// POST /api/room-requests - 提交住宿申请
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<RoomRequestCreate>,
) -> AppResult<Json<ApiResponse<RoomRequest>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let request = room_request::create(state.pool(), user.id, &user.name, payload).await?;
    Ok(ok(request))
}

/// GET /api/room-requests - 申请列表
///
/// 访客只能看到自己的申请；员工可按状态/用户过滤。
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(mut filter): Query<RoomRequestFilter>,
) -> AppResult<Json<ApiResponse<Vec<RoomRequestWithDetails>>>> {
    if !user.is_staff() {
        filter.user_id = Some(user.id);
    }
    let requests = room_request::find_all(state.pool(), &filter).await?;

    let mut detailed = Vec::with_capacity(requests.len());
    for request in requests {
        detailed.push(with_details(&state, request).await);
    }
    Ok(ok(detailed))
}

/// GET /api/room-requests/:id - 获取单个申请 (属主或员工)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RoomRequestWithDetails>>> {
    let request = load_owned(&state, &user, id).await?;
    Ok(ok(with_details(&state, request).await))
}

/// PUT /api/room-requests/:id/people - 修改人数 (属主，仅限 Pending)
pub async fn update_people(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PeopleUpdate>,
) -> AppResult<Json<ApiResponse<RoomRequest>>> {
    load_owned(&state, &user, id).await?;

    match room_request::update_people(state.pool(), id, payload.number_of_people).await {
        Ok(request) => Ok(ok(request)),
        Err(RepoError::NotFound(_)) => Err(request_not_found(id)),
        Err(RepoError::Conflict(msg)) => {
            Err(AppError::with_message(ErrorCode::RequestNotPending, msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/room-requests/:id/admin - 管理员修正 (员工)
pub async fn admin_update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoomRequestAdminPatch>,
) -> AppResult<Json<ApiResponse<RoomRequest>>> {
    match room_request::admin_update(state.pool(), id, payload).await {
        Ok(request) => Ok(ok(request)),
        Err(RepoError::NotFound(_)) => Err(request_not_found(id)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/room-requests/:id - 撤回申请 (属主，仅限 Pending)
pub async fn withdraw(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    load_owned(&state, &user, id).await?;

    match room_request::withdraw(state.pool(), id).await {
        Ok(()) => Ok(ok_with_message(true, "Stay request withdrawn")),
        Err(RepoError::NotFound(_)) => Err(request_not_found(id)),
        Err(RepoError::Conflict(msg)) => {
            Err(AppError::with_message(ErrorCode::RequestNotPending, msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/room-requests/:id/process - 审批 (员工)
///
/// 批准时可附带 room_id 直接分配房间；分配失败不回滚审批，
/// 以 warning 返回。
pub async fn process(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProcessRequest>,
) -> AppResult<Json<ApiResponse<ProcessOutcome>>> {
    let outcome =
        crate::services::assignment::process_request(state.pool(), id, payload, user.id).await?;
    Ok(ok(outcome))
}
