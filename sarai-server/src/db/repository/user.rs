//! User Directory Repository
//!
//! Read-only: accounts are provisioned by the external identity service,
//! this backend only looks them up for enrichment views.

use super::RepoResult;
use shared::models::User;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, email, name, role, is_important, phone_number, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM user WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM user ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
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

        sqlx::query(
            "INSERT INTO user (id, email, name, role) VALUES (7, 'asha@example.com', 'Asha', 'GUEST')",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let pool = test_pool().await;
        let user = find_by_id(&pool, 7).await.unwrap().unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.role, Role::Guest);
        assert!(find_by_id(&pool, 8).await.unwrap().is_none());
    }
}
