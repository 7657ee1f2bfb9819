//! Settings database operations
//!
//! Provides get/set accessors for the `settings` table following the
//! key-value pattern. API keys live here once resolved (see `crate::config`)
//! so the database is the steady-state configuration source.

use fanshelf_common::{Error, Result};
use sqlx::{Pool, Sqlite};

#[cfg(test)]
use sqlx::SqlitePool;

/// Get OMDB API key from database
///
/// Returns Some(key) if set, None otherwise
pub async fn get_omdb_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting(db, "omdb_api_key").await
}

/// Set OMDB API key in database
pub async fn set_omdb_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, "omdb_api_key", key).await
}

/// Get api-sports API key from database
///
/// One key covers both the football and basketball providers
pub async fn get_sports_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting(db, "sports_api_key").await
}

/// Set api-sports API key in database
pub async fn set_sports_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, "sports_api_key", key).await
}

/// Generic setting getter (internal)
async fn get_setting(db: &Pool<Sqlite>, key: &str) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    Ok(row.and_then(|(value,)| value))
}

/// Generic setting setter (internal)
async fn set_setting(db: &Pool<Sqlite>, key: &str, value: String) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Setup in-memory test database with settings table
    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();

        fanshelf_common::db::init::create_settings_table(&pool)
            .await
            .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_get_omdb_api_key_not_set() {
        let pool = setup_test_db().await;

        let result = get_omdb_api_key(&pool).await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_set_and_get_omdb_api_key() {
        let pool = setup_test_db().await;

        set_omdb_api_key(&pool, "omdb_key_123".to_string())
            .await
            .unwrap();

        let result = get_omdb_api_key(&pool).await.unwrap();
        assert_eq!(result, Some("omdb_key_123".to_string()));
    }

    #[tokio::test]
    async fn test_set_sports_api_key_update() {
        let pool = setup_test_db().await;

        set_sports_api_key(&pool, "old_key".to_string())
            .await
            .unwrap();
        set_sports_api_key(&pool, "new_key".to_string())
            .await
            .unwrap();

        let result = get_sports_api_key(&pool).await.unwrap();
        assert_eq!(result, Some("new_key".to_string()));

        // Upsert, not insert-again
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM settings WHERE key = 'sports_api_key'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let pool = setup_test_db().await;

        set_omdb_api_key(&pool, "omdb".to_string()).await.unwrap();
        set_sports_api_key(&pool, "sports".to_string())
            .await
            .unwrap();

        assert_eq!(
            get_omdb_api_key(&pool).await.unwrap(),
            Some("omdb".to_string())
        );
        assert_eq!(
            get_sports_api_key(&pool).await.unwrap(),
            Some("sports".to_string())
        );
    }
}
