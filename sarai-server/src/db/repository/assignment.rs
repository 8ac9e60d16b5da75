//! Room Assignment Repository
//!
//! The occupancy ledger. A room has at most one live (not checked out)
//! assignment, enforced by a partial unique index; the check-in/check-out
//! transitions are one-way conditional UPDATEs.

use super::{RepoError, RepoResult};
use shared::models::{AssignmentCreate, RoomAssignment};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, room_id, user_id, request_id, guest_names, dining_hall_preference, check_in_date, check_out_date, assigned_by, assigned_at, checked_in, checked_in_at, checked_out, checked_out_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RoomAssignment>> {
    let assignment = sqlx::query_as::<_, RoomAssignment>(&format!(
        "SELECT {COLUMNS} FROM room_assignment WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(assignment)
}

pub async fn find_by_request(pool: &SqlitePool, request_id: i64) -> RepoResult<Option<RoomAssignment>> {
    let assignment = sqlx::query_as::<_, RoomAssignment>(&format!(
        "SELECT {COLUMNS} FROM room_assignment WHERE request_id = ? ORDER BY assigned_at DESC LIMIT 1"
    ))
    .bind(request_id)
    .fetch_optional(pool)
    .await?;
    Ok(assignment)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<RoomAssignment>> {
    let assignments = sqlx::query_as::<_, RoomAssignment>(&format!(
        "SELECT {COLUMNS} FROM room_assignment WHERE user_id = ? ORDER BY assigned_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(assignments)
}

pub async fn find_all(pool: &SqlitePool, active_only: bool) -> RepoResult<Vec<RoomAssignment>> {
    let assignments = sqlx::query_as::<_, RoomAssignment>(&format!(
        "SELECT {COLUMNS} FROM room_assignment \
         WHERE (?1 = 0 OR checked_out = 0) \
         ORDER BY assigned_at DESC"
    ))
    .bind(active_only)
    .fetch_all(pool)
    .await?;
    Ok(assignments)
}

/// Insert the ledger row. The caller owns the room claim; the partial
/// unique index on (room_id) WHERE checked_out = 0 backstops a double
/// assignment, surfacing as `Duplicate`.
pub async fn create(
    pool: &SqlitePool,
    data: &AssignmentCreate,
    assigned_by: i64,
) -> RepoResult<RoomAssignment> {
    if data.check_out_date <= data.check_in_date {
        return Err(RepoError::Validation(
            "Check-out date must be after check-in date".into(),
        ));
    }

    let guest_names_json = serde_json::to_string(&data.guest_names)
        .map_err(|e| RepoError::Validation(format!("Invalid guest names payload: {e}")))?;
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let result = sqlx::query(
        "INSERT INTO room_assignment (id, room_id, user_id, request_id, guest_names, dining_hall_preference, check_in_date, check_out_date, assigned_by, assigned_at, checked_in, checked_out) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, 0)",
    )
    .bind(id)
    .bind(data.room_id)
    .bind(data.user_id)
    .bind(data.request_id)
    .bind(&guest_names_json)
    .bind(&data.dining_hall_preference)
    .bind(data.check_in_date)
    .bind(data.check_out_date)
    .bind(assigned_by)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(RepoError::Duplicate(format!(
                "Room {} already has an active assignment",
                data.room_id
            )));
        }
        Err(e) => return Err(e.into()),
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create assignment".into()))
}

/// Check the guest in. Fails with `Conflict` if already checked in or
/// already checked out; the race loser sees the same error.
pub async fn check_in(pool: &SqlitePool, id: i64) -> RepoResult<RoomAssignment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE room_assignment SET checked_in = 1, checked_in_at = ?1 WHERE id = ?2 AND checked_in = 0 AND checked_out = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Assignment {id} not found"))),
            Some(a) if a.checked_out => Err(RepoError::Conflict(format!(
                "Assignment {id} is already checked out"
            ))),
            Some(_) => Err(RepoError::Conflict(format!(
                "Assignment {id} is already checked in"
            ))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Assignment {id} not found")))
}

/// Check the guest out. Requires a prior check-in.
pub async fn check_out(pool: &SqlitePool, id: i64) -> RepoResult<RoomAssignment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE room_assignment SET checked_out = 1, checked_out_at = ?1 WHERE id = ?2 AND checked_in = 1 AND checked_out = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Assignment {id} not found"))),
            Some(a) if a.checked_out => Err(RepoError::Conflict(format!(
                "Assignment {id} is already checked out"
            ))),
            Some(_) => Err(RepoError::Conflict(format!(
                "Assignment {id} has not been checked in"
            ))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Assignment {id} not found")))
}
