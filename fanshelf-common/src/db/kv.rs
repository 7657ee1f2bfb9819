//! Key-value storage substrate
//!
//! String-keyed get/set/remove over the `storage` table. This is the only
//! durability layer the favorites stores use: every value is the complete
//! JSON blob for one collection, rewritten in full on each mutation.

use crate::{Error, Result};
use sqlx::{Pool, Sqlite};

/// Read the value stored under `key`
///
/// Returns None when the key has never been written (or was removed).
pub async fn get(db: &Pool<Sqlite>, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM storage WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    Ok(row.map(|(value,)| value))
}

/// Write `value` under `key`, replacing any previous value
pub async fn set(db: &Pool<Sqlite>, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO storage (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value)
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Remove `key` entirely
///
/// Removing an absent key is not an error.
pub async fn remove(db: &Pool<Sqlite>, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM storage WHERE key = ?")
        .bind(key)
        .execute(db)
        .await
        .map_err(Error::Database)?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
