//! 房间分配服务
//!
//! 分配先抢占房间 (claim)，再写台账；台账写入失败时补偿释放。
//! 入住/退房的状态闸门在 repository 层；这里编排附带动作
//! (餐券签发、房间释放、未用券回收)，附带动作失败不回滚主动作，
//! 以 `warning` 的形式返回。

use serde::Serialize;
use shared::models::{
    AssignmentCreate, ProcessRequest, RequestStatus, RoomAssignment, RoomRequest,
};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

use crate::db::repository::{self, RepoError};
use crate::utils::AppResult;

/// Check-in result: the ledger row plus what happened around it.
#[derive(Debug, Serialize)]
pub struct CheckInOutcome {
    pub assignment: RoomAssignment,
    pub passes_issued: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Check-out result.
#[derive(Debug, Serialize)]
pub struct CheckOutOutcome {
    pub assignment: RoomAssignment,
    pub passes_revoked: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Decision result: the request, and the assignment when approval
/// carried a room.
#[derive(Debug, Serialize)]
pub struct ProcessOutcome {
    pub request: RoomRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<RoomAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Assign a room. The room claim is the exclusivity gate: the loser of
/// a concurrent assignment sees `RoomOccupied`.
pub async fn assign(
    pool: &SqlitePool,
    data: AssignmentCreate,
    assigned_by: i64,
) -> AppResult<RoomAssignment> {
    match repository::room::claim(pool, data.room_id).await {
        Ok(()) => {}
        Err(RepoError::NotFound(_)) => {
            return Err(AppError::with_message(
                ErrorCode::RoomNotFound,
                format!("Room {} not found", data.room_id),
            ));
        }
        Err(RepoError::Conflict(_)) => {
            return Err(AppError::with_message(
                ErrorCode::RoomOccupied,
                format!("Room {} is already occupied", data.room_id),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    match repository::assignment::create(pool, &data, assigned_by).await {
        Ok(assignment) => Ok(assignment),
        Err(err) => {
            // 补偿释放，避免房间卡在占用态
            if let Err(release_err) = repository::room::release(pool, data.room_id).await {
                tracing::error!(
                    room_id = data.room_id,
                    error = %release_err,
                    "Failed to release room after assignment insert failure"
                );
            }
            match err {
                RepoError::Duplicate(_) => Err(AppError::with_message(
                    ErrorCode::RoomHasActiveAssignment,
                    format!("Room {} already has an active assignment", data.room_id),
                )),
                other => Err(other.into()),
            }
        }
    }
}

/// Decide a pending request. Approval with a room also assigns it; if
/// that assignment fails the decision stands and the failure comes back
/// as a warning for the operator to retry by direct assignment.
pub async fn process_request(
    pool: &SqlitePool,
    request_id: i64,
    data: ProcessRequest,
    staff_id: i64,
) -> AppResult<ProcessOutcome> {
    let request =
        match repository::room_request::process(pool, request_id, data.status, staff_id).await {
            Ok(request) => request,
            Err(RepoError::NotFound(msg)) => {
                return Err(AppError::with_message(ErrorCode::RequestNotFound, msg));
            }
            Err(RepoError::Conflict(msg)) => {
                return Err(AppError::with_message(ErrorCode::RequestAlreadyProcessed, msg));
            }
            Err(e) => return Err(e.into()),
        };

    let mut outcome = ProcessOutcome {
        request,
        assignment: None,
        warning: None,
    };

    if data.status == RequestStatus::Approved {
        if let Some(room_id) = data.room_id {
            let create = AssignmentCreate {
                room_id,
                user_id: outcome.request.user_id,
                request_id: outcome.request.id,
                check_in_date: outcome.request.check_in_date,
                check_out_date: outcome.request.check_out_date,
                guest_names: Vec::new(),
                dining_hall_preference: String::new(),
            };
            match assign(pool, create, staff_id).await {
                Ok(assignment) => outcome.assignment = Some(assignment),
                Err(err) => {
                    tracing::warn!(
                        request_id,
                        room_id,
                        error = %err.message,
                        "Request approved but room assignment failed"
                    );
                    outcome.warning =
                        Some(format!("Request approved, but room assignment failed: {}", err.message));
                }
            }
        }
    }

    Ok(outcome)
}

async fn map_check_conflict(pool: &SqlitePool, id: i64, checking_in: bool) -> AppError {
    match repository::assignment::find_by_id(pool, id).await {
        Ok(Some(a)) if a.checked_out => AppError::with_message(
            ErrorCode::AlreadyCheckedOut,
            format!("Assignment {id} is already checked out"),
        ),
        Ok(Some(a)) if checking_in && a.checked_in => AppError::with_message(
            ErrorCode::AlreadyCheckedIn,
            format!("Assignment {id} is already checked in"),
        ),
        Ok(Some(_)) if !checking_in => AppError::with_message(
            ErrorCode::NotCheckedIn,
            format!("Assignment {id} has not been checked in"),
        ),
        _ => AppError::with_message(
            ErrorCode::AssignmentNotFound,
            format!("Assignment {id} not found"),
        ),
    }
}

/// Check a guest in and issue their meal passes for the stay window.
/// Issuance failure does not undo the check-in.
pub async fn check_in(pool: &SqlitePool, id: i64, staff_id: i64) -> AppResult<CheckInOutcome> {
    let assignment = match repository::assignment::check_in(pool, id).await {
        Ok(assignment) => assignment,
        Err(RepoError::NotFound(msg)) => {
            return Err(AppError::with_message(ErrorCode::AssignmentNotFound, msg));
        }
        Err(RepoError::Conflict(_)) => return Err(map_check_conflict(pool, id, true).await),
        Err(e) => return Err(e.into()),
    };

    let (passes_issued, warning) =
        match super::food_pass::issue_for_assignment(pool, &assignment, staff_id).await {
            Ok(count) => (count, None),
            Err(err) => {
                tracing::warn!(
                    assignment_id = id,
                    error = %err.message,
                    "Checked in, but meal pass issuance failed"
                );
                (
                    0,
                    Some(format!("Checked in, but meal pass issuance failed: {}", err.message)),
                )
            }
        };

    Ok(CheckInOutcome {
        assignment,
        passes_issued,
        warning,
    })
}

/// Check a guest out: free the room and revoke the guest's unused
/// passes. Both follow-ups are best-effort.
pub async fn check_out(pool: &SqlitePool, id: i64) -> AppResult<CheckOutOutcome> {
    let assignment = match repository::assignment::check_out(pool, id).await {
        Ok(assignment) => assignment,
        Err(RepoError::NotFound(msg)) => {
            return Err(AppError::with_message(ErrorCode::AssignmentNotFound, msg));
        }
        Err(RepoError::Conflict(_)) => return Err(map_check_conflict(pool, id, false).await),
        Err(e) => return Err(e.into()),
    };

    let mut warnings: Vec<String> = Vec::new();

    if let Err(err) = repository::room::release(pool, assignment.room_id).await {
        tracing::error!(
            assignment_id = id,
            room_id = assignment.room_id,
            error = %err,
            "Checked out, but room release failed"
        );
        warnings.push(format!("room release failed: {err}"));
    }

    let passes_revoked = match repository::food_pass::revoke_unused(pool, assignment.user_id).await
    {
        Ok(count) => count,
        Err(err) => {
            tracing::error!(
                assignment_id = id,
                user_id = assignment.user_id,
                error = %err,
                "Checked out, but pass revocation failed"
            );
            warnings.push(format!("pass revocation failed: {err}"));
            0
        }
    };

    let warning = if warnings.is_empty() {
        None
    } else {
        Some(format!("Checked out with issues: {}", warnings.join("; ")))
    };

    Ok(CheckOutOutcome {
        assignment,
        passes_revoked,
        warning,
    })
}
