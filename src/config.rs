//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};
use crate::repository::IN_MEMORY;

const DEFAULT_DATABASE_NAME: &str = "item_database";
const DEFAULT_APP_NAME: &str = "Inventory";
const DEFAULT_STOP_TIMEOUT_MS: u64 = 5_000;

/// Runtime settings; every field has a default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the database file
    pub data_dir: PathBuf,
    /// Database file name, or `:memory:`
    pub database_name: String,
    /// Log directory; `<data_dir>/logs` when unset
    pub log_dir: Option<PathBuf>,
    pub app_name: String,
    /// How long screen state keeps its query alive with nobody watching
    pub stop_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            log_dir: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    /// Defaults rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Config backed by a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            database_name: IN_MEMORY.to_string(),
            ..Default::default()
        }
    }

    /// Read a JSON config file. A missing file means defaults.
    pub fn load(path: &Path) -> DomainResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|e| {
            DomainError::InvalidInput(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    pub fn database_path(&self) -> PathBuf {
        if self.database_name == IN_MEMORY {
            PathBuf::from(IN_MEMORY)
        } else {
            self.data_dir.join(&self.database_name)
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}
