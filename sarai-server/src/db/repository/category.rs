//! Catalog Repository: room categories and dining halls

use super::{RepoError, RepoResult};
use shared::models::{
    DiningHallCategory, DiningHallCreate, DiningHallPatch, RoomCategory, RoomCategoryCreate,
    RoomCategoryPatch, is_valid_color_code,
};
use sqlx::SqlitePool;

const ROOM_COLUMNS: &str = "id, room_name, price, images, created_at, updated_at";
const HALL_COLUMNS: &str = "id, building_name, color_code, created_at";

// ---------- Room categories ----------

pub async fn find_room_category(pool: &SqlitePool, id: i64) -> RepoResult<Option<RoomCategory>> {
    let category = sqlx::query_as::<_, RoomCategory>(&format!(
        "SELECT {ROOM_COLUMNS} FROM room_category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn list_room_categories(pool: &SqlitePool) -> RepoResult<Vec<RoomCategory>> {
    let categories = sqlx::query_as::<_, RoomCategory>(&format!(
        "SELECT {ROOM_COLUMNS} FROM room_category ORDER BY room_name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn create_room_category(
    pool: &SqlitePool,
    data: RoomCategoryCreate,
) -> RepoResult<RoomCategory> {
    let images_json = serde_json::to_string(&data.images)
        .map_err(|e| RepoError::Validation(format!("Invalid images payload: {e}")))?;
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO room_category (id, room_name, price, images, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.room_name)
    .bind(&data.price)
    .bind(&images_json)
    .bind(now)
    .execute(pool)
    .await?;

    find_room_category(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create room category".into()))
}

pub async fn update_room_category(
    pool: &SqlitePool,
    id: i64,
    data: RoomCategoryPatch,
) -> RepoResult<RoomCategory> {
    let images_json = match &data.images {
        Some(images) => Some(
            serde_json::to_string(images)
                .map_err(|e| RepoError::Validation(format!("Invalid images payload: {e}")))?,
        ),
        None => None,
    };
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE room_category SET \
            room_name = COALESCE(?1, room_name), \
            price = COALESCE(?2, price), \
            images = COALESCE(?3, images), \
            updated_at = ?4 \
         WHERE id = ?5",
    )
    .bind(&data.room_name)
    .bind(&data.price)
    .bind(&images_json)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Room category {id} not found")));
    }
    find_room_category(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Room category {id} not found")))
}

pub async fn delete_room_category(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM room_category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Room category {id} not found")));
    }
    Ok(())
}

// ---------- Dining halls ----------

pub async fn find_dining_hall(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningHallCategory>> {
    let hall = sqlx::query_as::<_, DiningHallCategory>(&format!(
        "SELECT {HALL_COLUMNS} FROM dining_hall_category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(hall)
}

/// Lookup by building name, used at issuance to resolve the pass color.
pub async fn find_dining_hall_by_building(
    pool: &SqlitePool,
    building_name: &str,
) -> RepoResult<Option<DiningHallCategory>> {
    let hall = sqlx::query_as::<_, DiningHallCategory>(&format!(
        "SELECT {HALL_COLUMNS} FROM dining_hall_category WHERE building_name = ?"
    ))
    .bind(building_name)
    .fetch_optional(pool)
    .await?;
    Ok(hall)
}

pub async fn list_dining_halls(pool: &SqlitePool) -> RepoResult<Vec<DiningHallCategory>> {
    let halls = sqlx::query_as::<_, DiningHallCategory>(&format!(
        "SELECT {HALL_COLUMNS} FROM dining_hall_category ORDER BY building_name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(halls)
}

pub async fn create_dining_hall(
    pool: &SqlitePool,
    data: DiningHallCreate,
) -> RepoResult<DiningHallCategory> {
    if !is_valid_color_code(&data.color_code) {
        return Err(RepoError::Validation(format!(
            "Invalid color code: {}",
            data.color_code
        )));
    }
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let result = sqlx::query(
        "INSERT INTO dining_hall_category (id, building_name, color_code, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(&data.building_name)
    .bind(&data.color_code)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(RepoError::Duplicate(format!(
                "Dining hall '{}' already exists",
                data.building_name
            )));
        }
        Err(e) => return Err(e.into()),
    }

    find_dining_hall(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining hall".into()))
}

pub async fn update_dining_hall(
    pool: &SqlitePool,
    id: i64,
    data: DiningHallPatch,
) -> RepoResult<DiningHallCategory> {
    if let Some(color) = &data.color_code {
        if !is_valid_color_code(color) {
            return Err(RepoError::Validation(format!("Invalid color code: {color}")));
        }
    }

    let rows = sqlx::query(
        "UPDATE dining_hall_category SET \
            building_name = COALESCE(?1, building_name), \
            color_code = COALESCE(?2, color_code) \
         WHERE id = ?3",
    )
    .bind(&data.building_name)
    .bind(&data.color_code)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining hall {id} not found")));
    }
    find_dining_hall(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dining hall {id} not found")))
}

pub async fn delete_dining_hall(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM dining_hall_category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining hall {id} not found")));
    }
    Ok(())
}
