//! Stay Request Repository

use super::{RepoError, RepoResult};
use shared::models::{
    PeopleCount, RequestStatus, RoomRequest, RoomRequestAdminPatch, RoomRequestCreate,
    RoomRequestFilter,
};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, user_id, name, form_name, place, purpose, check_in_date, check_out_date, number_of_people, special_requests, status, processed_by, processed_at, reference, public_id, created_at, updated_at";

fn validate_people(people: &PeopleCount) -> RepoResult<()> {
    if people.male < 0 || people.female < 0 || people.children < 0 {
        return Err(RepoError::Validation(
            "Headcount fields cannot be negative".into(),
        ));
    }
    if people.male + people.female + people.children < 1 {
        return Err(RepoError::Validation("Headcount must be at least 1".into()));
    }
    Ok(())
}

fn validate_window(check_in: i64, check_out: i64) -> RepoResult<()> {
    if check_out <= check_in {
        return Err(RepoError::Validation(
            "Check-out date must be after check-in date".into(),
        ));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RoomRequest>> {
    let request =
        sqlx::query_as::<_, RoomRequest>(&format!("SELECT {COLUMNS} FROM room_request WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(request)
}

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    user_name: &str,
    data: RoomRequestCreate,
) -> RepoResult<RoomRequest> {
    validate_people(&data.number_of_people)?;
    validate_window(data.check_in_date, data.check_out_date)?;

    // Total is never trusted from the client
    let people = data.number_of_people.with_total();
    let people_json = serde_json::to_string(&people)
        .map_err(|e| RepoError::Validation(format!("Invalid headcount payload: {e}")))?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let public_id = shared::util::public_request_code();

    sqlx::query(
        "INSERT INTO room_request (id, user_id, name, form_name, place, purpose, check_in_date, check_out_date, number_of_people, special_requests, status, reference, public_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'PENDING', ?11, ?12, ?13, ?13)",
    )
    .bind(id)
    .bind(user_id)
    .bind(user_name)
    .bind(&data.form_name)
    .bind(&data.place)
    .bind(&data.purpose)
    .bind(data.check_in_date)
    .bind(data.check_out_date)
    .bind(&people_json)
    .bind(&data.special_requests)
    .bind(&data.reference)
    .bind(&public_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create stay request".into()))
}

pub async fn find_all(pool: &SqlitePool, filter: &RoomRequestFilter) -> RepoResult<Vec<RoomRequest>> {
    let requests = sqlx::query_as::<_, RoomRequest>(&format!(
        "SELECT {COLUMNS} FROM room_request \
         WHERE (?1 IS NULL OR status = ?1) \
           AND (?2 IS NULL OR user_id = ?2) \
         ORDER BY created_at DESC"
    ))
    .bind(filter.status)
    .bind(filter.user_id)
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

/// Headcount edit, valid only while the request is still pending.
/// Ownership is checked by the caller; the Pending gate is atomic here.
pub async fn update_people(
    pool: &SqlitePool,
    id: i64,
    people: PeopleCount,
) -> RepoResult<RoomRequest> {
    validate_people(&people)?;
    let people = people.with_total();
    let people_json = serde_json::to_string(&people)
        .map_err(|e| RepoError::Validation(format!("Invalid headcount payload: {e}")))?;
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE room_request SET number_of_people = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'PENDING'",
    )
    .bind(&people_json)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Stay request {id} not found"))),
            Some(_) => Err(RepoError::Conflict(format!(
                "Stay request {id} is no longer pending"
            ))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Stay request {id} not found")))
}

/// Administrative edit (staff): bypasses the owner and Pending gates.
pub async fn admin_update(
    pool: &SqlitePool,
    id: i64,
    data: RoomRequestAdminPatch,
) -> RepoResult<RoomRequest> {
    if let Some(people) = &data.number_of_people {
        validate_people(people)?;
    }

    let people_json = match data.number_of_people {
        Some(people) => Some(
            serde_json::to_string(&people.with_total())
                .map_err(|e| RepoError::Validation(format!("Invalid headcount payload: {e}")))?,
        ),
        None => None,
    };
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE room_request SET \
            check_in_date = COALESCE(?1, check_in_date), \
            check_out_date = COALESCE(?2, check_out_date), \
            number_of_people = COALESCE(?3, number_of_people), \
            form_name = COALESCE(?4, form_name), \
            purpose = COALESCE(?5, purpose), \
            place = COALESCE(?6, place), \
            special_requests = COALESCE(?7, special_requests), \
            reference = COALESCE(?8, reference), \
            updated_at = ?9 \
         WHERE id = ?10",
    )
    .bind(data.check_in_date)
    .bind(data.check_out_date)
    .bind(&people_json)
    .bind(&data.form_name)
    .bind(&data.purpose)
    .bind(&data.place)
    .bind(&data.special_requests)
    .bind(&data.reference)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Stay request {id} not found")));
    }

    let updated = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Stay request {id} not found")))?;
    validate_window(updated.check_in_date, updated.check_out_date)?;
    Ok(updated)
}

/// Withdraw a pending request. Ownership is checked by the caller.
pub async fn withdraw(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM room_request WHERE id = ? AND status = 'PENDING'")
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Stay request {id} not found"))),
            Some(_) => Err(RepoError::Conflict(format!(
                "Stay request {id} is no longer pending"
            ))),
        };
    }
    Ok(())
}

/// Terminal decision. Only a pending request can be processed; the loser
/// of a double-process race gets `Conflict`.
pub async fn process(
    pool: &SqlitePool,
    id: i64,
    status: RequestStatus,
    staff_id: i64,
) -> RepoResult<RoomRequest> {
    if status == RequestStatus::Pending {
        return Err(RepoError::Validation(
            "Process status must be APPROVED or REJECTED".into(),
        ));
    }
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE room_request SET status = ?1, processed_by = ?2, processed_at = ?3, updated_at = ?3 WHERE id = ?4 AND status = 'PENDING'",
    )
    .bind(status)
    .bind(staff_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Stay request {id} not found"))),
            Some(_) => Err(RepoError::Conflict(format!(
                "Stay request {id} has already been processed"
            ))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Stay request {id} not found")))
}
