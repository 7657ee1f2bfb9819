//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "FANSHELF_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "fanshelf.db";

/// Bootstrap configuration loaded from the TOML config file
///
/// These settings cannot change during runtime. The service must restart
/// to pick up changes to the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database file (overrides the root folder default)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Root folder for application data
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream API keys (lowest-priority source, see fanshelf-ui config)
    #[serde(default)]
    pub api_keys: ApiKeysToml,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// API key section of the TOML config file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiKeysToml {
    /// OMDB movie metadata API key
    #[serde(default)]
    pub omdb: Option<String>,

    /// api-sports key (shared by football and basketball)
    #[serde(default)]
    pub sports: Option<String>,
}

pub fn default_port() -> u16 {
    5730
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {:?}: {}", path, e)))
    }

    /// Load the platform config file if one exists, otherwise defaults
    pub fn load_default() -> Self {
        match find_config_file() {
            Some(path) => Self::load(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config file: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. FANSHELF_ROOT_FOLDER environment variable
/// 3. TOML config file `root_folder` key
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = find_config_file() {
        if let Ok(config) = TomlConfig::load(&config_path) {
            if let Some(root_folder) = config.root_folder {
                return root_folder;
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Get the platform config file path, if one exists
///
/// Checks ~/.config/fanshelf/config.toml (XDG equivalent per platform),
/// then /etc/fanshelf/config.toml on Linux.
pub fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("fanshelf").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/fanshelf/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/fanshelf (or /var/lib/fanshelf for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("fanshelf"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/fanshelf"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/fanshelf
        dirs::data_dir()
            .map(|d| d.join("fanshelf"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/fanshelf"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\fanshelf
        dirs::data_local_dir()
            .map(|d| d.join("fanshelf"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\fanshelf"))
    } else {
        PathBuf::from("./fanshelf_data")
    }
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        tracing::info!("Created root folder: {}", root.display());
    }
    Ok(())
}

/// Database file path inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}
