//! Room Repository

use super::{RepoError, RepoResult};
use shared::models::{Room, RoomCreate, RoomFilter, RoomPatch, RoomStats};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, room_number, floor, room_type, beds, has_geyser, has_ac, has_sofa_set, sofa_set_quantity, extra_amenities, is_visible, is_occupied, needs_cleaning, building, room_category_id, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Room>> {
    let room = sqlx::query_as::<_, Room>(&format!("SELECT {COLUMNS} FROM room WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(room)
}

pub async fn create(pool: &SqlitePool, data: RoomCreate) -> RepoResult<Room> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let beds = serde_json::to_string(&data.beds)
        .map_err(|e| RepoError::Validation(format!("Invalid beds payload: {e}")))?;

    let result = sqlx::query(
        "INSERT INTO room (id, room_number, floor, room_type, beds, has_geyser, has_ac, has_sofa_set, sofa_set_quantity, extra_amenities, is_visible, is_occupied, needs_cleaning, building, room_category_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, 0, ?12, ?13, ?14, ?14)",
    )
    .bind(id)
    .bind(&data.room_number)
    .bind(data.floor)
    .bind(data.room_type)
    .bind(&beds)
    .bind(data.has_geyser)
    .bind(data.has_ac)
    .bind(data.has_sofa_set)
    .bind(data.sofa_set_quantity)
    .bind(&data.extra_amenities)
    .bind(data.is_visible)
    .bind(&data.building)
    .bind(data.room_category_id)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) => {
            let repo_err = RepoError::from(e);
            if let RepoError::Duplicate(_) = repo_err {
                return Err(RepoError::Duplicate(format!(
                    "Room {} already exists in building '{}'",
                    data.room_number, data.building
                )));
            }
            return Err(repo_err);
        }
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create room".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: RoomPatch) -> RepoResult<Room> {
    let now = shared::util::now_millis();
    let beds = match &data.beds {
        Some(b) => Some(
            serde_json::to_string(b)
                .map_err(|e| RepoError::Validation(format!("Invalid beds payload: {e}")))?,
        ),
        None => None,
    };

    let rows = sqlx::query(
        "UPDATE room SET \
            room_number = COALESCE(?1, room_number), \
            floor = COALESCE(?2, floor), \
            room_type = COALESCE(?3, room_type), \
            beds = COALESCE(?4, beds), \
            has_geyser = COALESCE(?5, has_geyser), \
            has_ac = COALESCE(?6, has_ac), \
            has_sofa_set = COALESCE(?7, has_sofa_set), \
            sofa_set_quantity = COALESCE(?8, sofa_set_quantity), \
            extra_amenities = COALESCE(?9, extra_amenities), \
            is_visible = COALESCE(?10, is_visible), \
            needs_cleaning = COALESCE(?11, needs_cleaning), \
            room_category_id = COALESCE(?12, room_category_id), \
            updated_at = ?13 \
         WHERE id = ?14",
    )
    .bind(&data.room_number)
    .bind(data.floor)
    .bind(data.room_type)
    .bind(&beds)
    .bind(data.has_geyser)
    .bind(data.has_ac)
    .bind(data.has_sofa_set)
    .bind(data.sofa_set_quantity)
    .bind(&data.extra_amenities)
    .bind(data.is_visible)
    .bind(data.needs_cleaning)
    .bind(data.room_category_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Room {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Room {id} not found")))
}

/// Hard delete. Refused while the room carries a live assignment.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let occupied: Option<bool> = sqlx::query_scalar("SELECT is_occupied FROM room WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match occupied {
        None => return Ok(false),
        Some(true) => {
            return Err(RepoError::Conflict(format!(
                "Room {id} has an active assignment"
            )));
        }
        Some(false) => {}
    }

    let rows = sqlx::query("DELETE FROM room WHERE id = ? AND is_occupied = 0")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// List rooms with optional filters. `visible_only` is forced for guests.
pub async fn find_all(
    pool: &SqlitePool,
    filter: &RoomFilter,
    visible_only: bool,
) -> RepoResult<Vec<Room>> {
    let rooms = sqlx::query_as::<_, Room>(&format!(
        "SELECT {COLUMNS} FROM room \
         WHERE (?1 IS NULL OR floor = ?1) \
           AND (?2 IS NULL OR room_type = ?2) \
           AND (?3 IS NULL OR building = ?3) \
           AND (?4 IS NULL OR is_visible = ?4) \
           AND (?5 IS NULL OR is_occupied = ?5) \
           AND (?6 = 0 OR is_visible = 1) \
         ORDER BY building, floor, room_number"
    ))
    .bind(filter.floor)
    .bind(filter.room_type)
    .bind(&filter.building)
    .bind(filter.is_visible)
    .bind(filter.is_occupied)
    .bind(visible_only)
    .fetch_all(pool)
    .await?;
    Ok(rooms)
}

pub async fn stats(pool: &SqlitePool) -> RepoResult<RoomStats> {
    let (total, occupied): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(is_occupied), 0) FROM room",
    )
    .fetch_one(pool)
    .await?;
    Ok(RoomStats {
        total_rooms: total,
        occupied_rooms: occupied,
        available_rooms: total - occupied,
    })
}

/// Distinct non-empty building names of visible rooms
pub async fn buildings(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT building FROM room WHERE is_visible = 1 AND building != '' ORDER BY building",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Distinct floors of a building's visible rooms
pub async fn floors(pool: &SqlitePool, building: &str) -> RepoResult<Vec<i64>> {
    let floors: Vec<i64> = sqlx::query_scalar(
        "SELECT DISTINCT floor FROM room WHERE is_visible = 1 AND building = ? ORDER BY floor",
    )
    .bind(building)
    .fetch_all(pool)
    .await?;
    Ok(floors)
}

/// Atomically claim a room for an assignment.
///
/// Exactly one caller wins when two assignments race for the same room;
/// the loser gets `Conflict`.
pub async fn claim(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE room SET is_occupied = 1, updated_at = ?1 WHERE id = ?2 AND is_occupied = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        // Distinguish missing room from lost race
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Room {id} not found"))),
            Some(_) => Err(RepoError::Conflict(format!("Room {id} is occupied"))),
        };
    }
    Ok(())
}

/// Release a room after check-out (idempotent)
pub async fn release(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE room SET is_occupied = 0, updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
