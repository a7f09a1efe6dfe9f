use crate::core::{CrudError, Result};
use rusqlite::Connection;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const IN_MEMORY: &str = ":memory:";

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`
    pub path: String,
    pub foreign_keys: bool,
    pub busy_timeout_ms: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: IN_MEMORY.to_string(),
            foreign_keys: true,
            busy_timeout_ms: None,
        }
    }
}

impl DatabaseConfig {
    /// Opens the configured database and applies the connection pragmas.
    pub fn open(&self) -> Result<Connection> {
        debug!("opening database {}", self.path);
        let conn = if self.path == IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            Connection::open(&self.path)?
        };

        conn.pragma_update(None, "foreign_keys", self.foreign_keys)?;
        if let Some(ms) = self.busy_timeout_ms {
            conn.busy_timeout(Duration::from_millis(ms))?;
        }
        Ok(conn)
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Arguments
///
/// * `path` - The file path to the TOML configuration file.
///
/// # Example
///
/// ```no_run
/// let config = simple_crud::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| CrudError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| CrudError::Config(format!("{}: {}", path.display(), e)))
}

/// `<config dir>/simple-crud/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("simple-crud").join("config.toml"))
}
