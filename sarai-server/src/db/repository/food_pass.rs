//! Meal Pass Repository
//!
//! Issuance is idempotent: a partial unique index over
//! (user_id, member_name, meal_type, date) WHERE is_used = 0 lets a
//! retried batch skip the passes that already exist. Redemption is a
//! single conditional UPDATE, so a pass can be consumed exactly once.

use super::{RepoError, RepoResult};
use shared::models::{FoodPass, FoodPassFilter, FoodPassPatch, MealType};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, user_id, member_name, meal_type, date, is_used, used_at, dining_hall, color_code, created_by, created_at";

/// One row of a batch, fully resolved by the service layer.
#[derive(Debug, Clone)]
pub struct PassSpec {
    pub user_id: i64,
    pub member_name: String,
    pub meal_type: MealType,
    /// `YYYY-MM-DD`
    pub date: String,
    pub dining_hall: String,
    pub color_code: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<FoodPass>> {
    let pass =
        sqlx::query_as::<_, FoodPass>(&format!("SELECT {COLUMNS} FROM food_pass WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(pass)
}

pub async fn find_for_user(
    pool: &SqlitePool,
    user_id: i64,
    filter: &FoodPassFilter,
) -> RepoResult<Vec<FoodPass>> {
    let passes = sqlx::query_as::<_, FoodPass>(&format!(
        "SELECT {COLUMNS} FROM food_pass \
         WHERE user_id = ?1 \
           AND (?2 IS NULL OR date = ?2) \
           AND (?3 IS NULL OR is_used = ?3) \
         ORDER BY date, member_name, meal_type"
    ))
    .bind(user_id)
    .bind(&filter.date)
    .bind(filter.is_used)
    .fetch_all(pool)
    .await?;
    Ok(passes)
}

/// Insert a batch, skipping rows an unused pass already covers.
/// Returns how many passes were actually created.
pub async fn issue_batch(
    pool: &SqlitePool,
    specs: &[PassSpec],
    created_by: i64,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let mut issued = 0u64;

    for spec in specs {
        let id = shared::util::snowflake_id();
        let rows = sqlx::query(
            "INSERT OR IGNORE INTO food_pass (id, user_id, member_name, meal_type, date, is_used, dining_hall, color_code, created_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?9)",
        )
        .bind(id)
        .bind(spec.user_id)
        .bind(&spec.member_name)
        .bind(spec.meal_type)
        .bind(&spec.date)
        .bind(&spec.dining_hall)
        .bind(&spec.color_code)
        .bind(created_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        issued += rows.rows_affected();
    }

    tx.commit().await?;
    Ok(issued)
}

/// Consume a pass. The precondition (exists, unused, not past its day)
/// is one WHERE clause; any failure collapses to the same `Conflict` so
/// a scanner cannot probe which check failed.
pub async fn redeem(pool: &SqlitePool, pass_id: i64, today: &str) -> RepoResult<FoodPass> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE food_pass SET is_used = 1, used_at = ?1 WHERE id = ?2 AND is_used = 0 AND date >= ?3",
    )
    .bind(now)
    .bind(pass_id)
    .bind(today)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(
            "Pass not found, already used, or expired".into(),
        ));
    }
    find_by_id(pool, pass_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pass {pass_id} not found")))
}

/// Delete every unused pass belonging to the guest. Used passes stay
/// for the audit trail. Returns how many were removed.
pub async fn revoke_unused(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM food_pass WHERE user_id = ? AND is_used = 0")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Staff correction of a single pass.
pub async fn update(pool: &SqlitePool, id: i64, data: FoodPassPatch) -> RepoResult<FoodPass> {
    let rows = sqlx::query(
        "UPDATE food_pass SET \
            member_name = COALESCE(?1, member_name), \
            meal_type = COALESCE(?2, meal_type), \
            date = COALESCE(?3, date), \
            is_used = COALESCE(?4, is_used), \
            dining_hall = COALESCE(?5, dining_hall), \
            color_code = COALESCE(?6, color_code) \
         WHERE id = ?7",
    )
    .bind(&data.member_name)
    .bind(data.meal_type)
    .bind(&data.date)
    .bind(data.is_used)
    .bind(&data.dining_hall)
    .bind(&data.color_code)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Pass {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pass {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn test_pool() -> SqlitePool {
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

        pool
    }

    fn specs_for(user_id: i64, members: &[&str], dates: &[&str]) -> Vec<PassSpec> {
        let mut specs = Vec::new();
        for date in dates {
            for member in members {
                for meal in MealType::ALL {
                    specs.push(PassSpec {
                        user_id,
                        member_name: member.to_string(),
                        meal_type: meal,
                        date: date.to_string(),
                        dining_hall: "Annapurna".to_string(),
                        color_code: "#FF6B35".to_string(),
                    });
                }
            }
        }
        specs
    }

    #[tokio::test]
    async fn test_issue_batch_counts_members_meals_days() {
        let pool = test_pool().await;
        let specs = specs_for(7, &["Asha", "Ravi"], &["2026-09-01", "2026-09-02", "2026-09-03"]);

        let issued = issue_batch(&pool, &specs, 1).await.unwrap();
        assert_eq!(issued, 18); // 2 members x 3 meals x 3 days
    }

    #[tokio::test]
    async fn test_issue_batch_is_idempotent() {
        let pool = test_pool().await;
        let specs = specs_for(7, &["Asha"], &["2026-09-01"]);

        assert_eq!(issue_batch(&pool, &specs, 1).await.unwrap(), 3);
        assert_eq!(issue_batch(&pool, &specs, 1).await.unwrap(), 0);

        // a used pass no longer blocks reissue for that slot
        let passes = find_for_user(&pool, 7, &FoodPassFilter::default())
            .await
            .unwrap();
        redeem(&pool, passes[0].id, "2026-09-01").await.unwrap();
        assert_eq!(issue_batch(&pool, &specs, 1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_redeem_exactly_once() {
        let pool = test_pool().await;
        let specs = specs_for(7, &["Asha"], &["2026-09-01"]);
        issue_batch(&pool, &specs, 1).await.unwrap();

        let passes = find_for_user(&pool, 7, &FoodPassFilter::default())
            .await
            .unwrap();
        let pass = redeem(&pool, passes[0].id, "2026-09-01").await.unwrap();
        assert!(pass.is_used);
        assert!(pass.used_at.is_some());

        assert!(matches!(
            redeem(&pool, passes[0].id, "2026-09-01").await,
            Err(RepoError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_redeem_failures_are_opaque() {
        let pool = test_pool().await;
        let specs = specs_for(7, &["Asha"], &["2026-09-01"]);
        issue_batch(&pool, &specs, 1).await.unwrap();
        let passes = find_for_user(&pool, 7, &FoodPassFilter::default())
            .await
            .unwrap();

        // expired pass and unknown pass produce the same error text
        let expired = redeem(&pool, passes[0].id, "2026-09-02").await.unwrap_err();
        let missing = redeem(&pool, 999, "2026-09-01").await.unwrap_err();
        assert_eq!(expired.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_revoke_unused_keeps_used_passes() {
        let pool = test_pool().await;
        let specs = specs_for(7, &["Asha"], &["2026-09-01", "2026-09-02"]);
        issue_batch(&pool, &specs, 1).await.unwrap();

        let passes = find_for_user(&pool, 7, &FoodPassFilter::default())
            .await
            .unwrap();
        redeem(&pool, passes[0].id, "2026-09-01").await.unwrap();

        let removed = revoke_unused(&pool, 7).await.unwrap();
        assert_eq!(removed, 5);

        let remaining = find_for_user(&pool, 7, &FoodPassFilter::default())
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].is_used);
    }

    #[tokio::test]
    async fn test_filter_by_date_and_usage() {
        let pool = test_pool().await;
        let specs = specs_for(7, &["Asha"], &["2026-09-01", "2026-09-02"]);
        issue_batch(&pool, &specs, 1).await.unwrap();

        let day_one = find_for_user(
            &pool,
            7,
            &FoodPassFilter {
                date: Some("2026-09-01".to_string()),
                is_used: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(day_one.len(), 3);

        let used = find_for_user(
            &pool,
            7,
            &FoodPassFilter {
                date: None,
                is_used: Some(true),
            },
        )
        .await
        .unwrap();
        assert!(used.is_empty());
    }

    #[tokio::test]
    async fn test_update_pass() {
        let pool = test_pool().await;
        let specs = specs_for(7, &["Asha"], &["2026-09-01"]);
        issue_batch(&pool, &specs, 1).await.unwrap();
        let passes = find_for_user(&pool, 7, &FoodPassFilter::default())
            .await
            .unwrap();

        let patched = update(
            &pool,
            passes[0].id,
            FoodPassPatch {
                dining_hall: Some("Gokul".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(patched.dining_hall, "Gokul");

        assert!(matches!(
            update(&pool, 999, FoodPassPatch::default()).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
