//! 餐券签发服务
//!
//! 把"日期区间 × 家庭成员 × 三餐"展开为具体的券行，并在签发时
//! 解析餐厅颜色。幂等性由 repository 层的部分唯一索引保证。

use shared::models::{FoodPassGenerate, MealType, RoomAssignment};
use sqlx::SqlitePool;

use crate::db::repository::{self, food_pass::PassSpec};
use crate::utils::{AppError, AppResult, time};

/// Resolve the pass color for a dining hall. An empty hall name means
/// "no hall assigned" and yields no color; a named but unconfigured
/// hall is a caller error.
async fn resolve_color(pool: &SqlitePool, dining_hall: &str) -> AppResult<String> {
    if dining_hall.is_empty() {
        return Ok(String::new());
    }
    match repository::category::find_dining_hall_by_building(pool, dining_hall).await? {
        Some(hall) => Ok(hall.color_code),
        None => Err(AppError::validation(format!(
            "Dining hall '{dining_hall}' is not configured"
        ))),
    }
}

fn expand_specs(
    user_id: i64,
    members: &[String],
    dates: &[String],
    dining_hall: &str,
    color_code: &str,
) -> Vec<PassSpec> {
    let mut specs = Vec::with_capacity(members.len() * dates.len() * MealType::ALL.len());
    for date in dates {
        for member in members {
            for meal in MealType::ALL {
                specs.push(PassSpec {
                    user_id,
                    member_name: member.clone(),
                    meal_type: meal,
                    date: date.clone(),
                    dining_hall: dining_hall.to_string(),
                    color_code: color_code.to_string(),
                });
            }
        }
    }
    specs
}

/// Staff batch issuance over an explicit date range.
pub async fn generate(pool: &SqlitePool, data: FoodPassGenerate, created_by: i64) -> AppResult<u64> {
    if data.member_names.is_empty() {
        return Err(AppError::validation("At least one member name is required"));
    }
    let dates = time::date_range_inclusive(&data.start_date, &data.end_date)?;
    let color = resolve_color(pool, &data.dining_hall).await?;
    let specs = expand_specs(
        data.user_id,
        &data.member_names,
        &dates,
        &data.dining_hall,
        &color,
    );
    Ok(repository::food_pass::issue_batch(pool, &specs, created_by).await?)
}

/// Issue passes covering an assignment's stay window at check-in.
/// Falls back to the guest's directory name when no member names were
/// recorded on the assignment.
pub async fn issue_for_assignment(
    pool: &SqlitePool,
    assignment: &RoomAssignment,
    created_by: i64,
) -> AppResult<u64> {
    let members = if assignment.guest_names.is_empty() {
        let name = repository::user::find_by_id(pool, assignment.user_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| format!("Guest {}", assignment.user_id));
        vec![name]
    } else {
        assignment.guest_names.clone()
    };

    let start = time::millis_to_date_str(assignment.check_in_date);
    let end = time::millis_to_date_str(assignment.check_out_date);
    let dates = time::date_range_inclusive(&start, &end)?;

    let color = resolve_color(pool, &assignment.dining_hall_preference).await?;
    let specs = expand_specs(
        assignment.user_id,
        &members,
        &dates,
        &assignment.dining_hall_preference,
        &color,
    );
    Ok(repository::food_pass::issue_batch(pool, &specs, created_by).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::DiningHallCreate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE food_pass (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                member_name TEXT NOT NULL,
                meal_type TEXT NOT NULL,
                date TEXT NOT NULL,
                is_used INTEGER NOT NULL DEFAULT 0,
                used_at INTEGER,
                dining_hall TEXT NOT NULL DEFAULT '',
                color_code TEXT NOT NULL DEFAULT '',
                created_by INTEGER NOT NULL,
                created_at INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE UNIQUE INDEX idx_food_pass_unused ON food_pass (user_id, member_name, meal_type, date) WHERE is_used = 0",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE dining_hall_category (
                id INTEGER PRIMARY KEY,
                building_name TEXT NOT NULL UNIQUE,
                color_code TEXT NOT NULL,
                created_at INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'GUEST',
                is_important INTEGER NOT NULL DEFAULT 0,
                phone_number TEXT NOT NULL DEFAULT '',
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_generate_resolves_hall_color() {
        let pool = test_pool().await;
        repository::category::create_dining_hall(
            &pool,
            DiningHallCreate {
                building_name: "Annapurna".to_string(),
                color_code: "#FF6B35".to_string(),
            },
        )
        .await
        .unwrap();

        let issued = generate(
            &pool,
            FoodPassGenerate {
                user_id: 7,
                member_names: vec!["Asha".to_string(), "Ravi".to_string()],
                start_date: "2026-09-01".to_string(),
                end_date: "2026-09-03".to_string(),
                dining_hall: "Annapurna".to_string(),
            },
            1,
        )
        .await
        .unwrap();
        assert_eq!(issued, 18);

        let passes =
            repository::food_pass::find_for_user(&pool, 7, &Default::default()).await.unwrap();
        assert!(passes.iter().all(|p| p.color_code == "#FF6B35"));
    }

    #[tokio::test]
    async fn test_generate_rejects_unknown_hall() {
        let pool = test_pool().await;
        let err = generate(
            &pool,
            FoodPassGenerate {
                user_id: 7,
                member_names: vec!["Asha".to_string()],
                start_date: "2026-09-01".to_string(),
                end_date: "2026-09-01".to_string(),
                dining_hall: "Nowhere".to_string(),
            },
            1,
        )
        .await
        .unwrap_err();
        assert!(err.message.contains("not configured"));
    }

    #[tokio::test]
    async fn test_issue_for_assignment_falls_back_to_directory_name() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO user (id, email, name) VALUES (7, 'asha@example.com', 'Asha')")
            .execute(&pool)
            .await
            .unwrap();

        let assignment = RoomAssignment {
            id: 1,
            room_id: 301,
            user_id: 7,
            request_id: 100,
            guest_names: vec![],
            dining_hall_preference: String::new(),
            check_in_date: 1_756_684_800_000,  // 2025-09-01
            check_out_date: 1_756_857_600_000, // 2025-09-03
            assigned_by: 1,
            assigned_at: 0,
            checked_in: false,
            checked_in_at: None,
            checked_out: false,
            checked_out_at: None,
        };

        let issued = issue_for_assignment(&pool, &assignment, 1).await.unwrap();
        assert_eq!(issued, 9); // 1 member x 3 meals x 3 days

        let passes =
            repository::food_pass::find_for_user(&pool, 7, &Default::default()).await.unwrap();
        assert!(passes.iter().all(|p| p.member_name == "Asha"));
    }
}
