//! API key resolution for fanshelf-ui
//!
//! Provides multi-tier configuration resolution with Database → ENV → TOML
//! priority. Keys resolved from a lower tier are written back to the
//! `settings` table so the database becomes the steady-state source.

use fanshelf_common::config::TomlConfig;
use fanshelf_common::Result;
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};

/// Environment variable carrying the OMDB API key
pub const OMDB_API_KEY_ENV: &str = "FANSHELF_OMDB_API_KEY";

/// Environment variable carrying the api-sports key
pub const SPORTS_API_KEY_ENV: &str = "FANSHELF_SPORTS_API_KEY";

/// Resolved provider keys, shared through AppState
///
/// `None` leaves the corresponding clients in place; their upstream calls
/// then fail with a clear missing-key error while favorites keep working.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// OMDB movie metadata key
    pub omdb: Option<String>,
    /// api-sports key (football and basketball share it; Formula 1 needs none)
    pub sports: Option<String>,
}

impl ApiKeys {
    /// Resolve both provider keys from 3-tier configuration
    pub async fn resolve(db: &Pool<Sqlite>, toml_config: &TomlConfig) -> Result<Self> {
        let omdb = resolve_omdb_api_key(db, toml_config).await?;
        let sports = resolve_sports_api_key(db, toml_config).await?;
        Ok(Self { omdb, sports })
    }
}

/// Resolve the OMDB API key from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_omdb_api_key(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
) -> Result<Option<String>> {
    let db_key = crate::db::settings::get_omdb_api_key(db)
        .await?
        .filter(|k| is_valid_key(k));
    let env_key = std::env::var(OMDB_API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config.api_keys.omdb.clone().filter(|k| is_valid_key(k));

    let (key, write_back) = pick_key("OMDB", db_key, env_key, toml_key);

    if write_back {
        if let Some(key) = &key {
            crate::db::settings::set_omdb_api_key(db, key.clone()).await?;
            info!("OMDB API key migrated to database");
        }
    }

    Ok(key)
}

/// Resolve the api-sports key from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_sports_api_key(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
) -> Result<Option<String>> {
    let db_key = crate::db::settings::get_sports_api_key(db)
        .await?
        .filter(|k| is_valid_key(k));
    let env_key = std::env::var(SPORTS_API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .api_keys
        .sports
        .clone()
        .filter(|k| is_valid_key(k));

    let (key, write_back) = pick_key("api-sports", db_key, env_key, toml_key);

    if write_back {
        if let Some(key) = &key {
            crate::db::settings::set_sports_api_key(db, key.clone()).await?;
            info!("api-sports API key migrated to database");
        }
    }

    Ok(key)
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Apply tier priority to the pre-validated candidates
///
/// Returns the winning key and whether it came from below the database
/// tier (and must be written back).
fn pick_key(
    label: &str,
    db_key: Option<String>,
    env_key: Option<String>,
    toml_key: Option<String>,
) -> (Option<String>, bool) {
    let mut sources = Vec::new();
    if db_key.is_some() {
        sources.push("database");
    }
    if env_key.is_some() {
        sources.push("environment");
    }
    if toml_key.is_some() {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "{} API key found in multiple sources: {}. Using {} (highest priority).",
            label,
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(key) = db_key {
        info!("{} API key loaded from database", label);
        return (Some(key), false);
    }
    if let Some(key) = env_key {
        info!("{} API key loaded from environment variable", label);
        return (Some(key), true);
    }
    if let Some(key) = toml_key {
        info!("{} API key loaded from TOML config", label);
        return (Some(key), true);
    }

    (None, false)
}
