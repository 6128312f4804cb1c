//! Adapter configuration
//!
//! Loaded from a JSON file and validated before use. Defaults mirror the
//! deployed medium: 4096-byte sectors, a 16 MiB volume, 256-byte
//! pathnames, ten simultaneously open files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vfs::LockDiscipline;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("invalid config JSON: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Adapter configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Adapter name reported in the descriptor (default "flashvfs")
    #[serde(default = "default_name")]
    pub name: String,

    /// Sector size of the medium in bytes (default 4096, power of two)
    #[serde(default = "default_sector_size")]
    pub sector_size: u32,

    /// Longest accepted pathname in bytes (default 256)
    #[serde(default = "default_max_pathname")]
    pub max_pathname: usize,

    /// Open-file budget for the RAM volume (default 10)
    #[serde(default = "default_max_open_files")]
    pub max_open_files: usize,

    /// Sector count of the RAM volume (default 4096)
    #[serde(default = "default_sector_count")]
    pub sector_count: u64,

    /// Whether operation tracing starts enabled (default false)
    #[serde(default)]
    pub trace: bool,

    /// Locking discipline: "single-task" or "mutual" (default "single-task")
    #[serde(default = "default_lock_mode")]
    pub lock_mode: String,
}

fn default_name() -> String {
    "flashvfs".to_string()
}
fn default_sector_size() -> u32 {
    4096
}
fn default_max_pathname() -> usize {
    256
}
fn default_max_open_files() -> usize {
    10
}
fn default_sector_count() -> u64 {
    4096
}
fn default_lock_mode() -> String {
    "single-task".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            sector_size: default_sector_size(),
            max_pathname: default_max_pathname(),
            max_open_files: default_max_open_files(),
            sector_count: default_sector_count(),
            trace: false,
            lock_mode: default_lock_mode(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".to_string()));
        }
        if self.sector_size == 0 || !self.sector_size.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "sector_size must be a power of two, got {}",
                self.sector_size
            )));
        }
        if self.max_pathname < 2 {
            return Err(ConfigError::Invalid(
                "max_pathname must be at least 2".to_string(),
            ));
        }
        if self.max_open_files == 0 {
            return Err(ConfigError::Invalid(
                "max_open_files must be > 0".to_string(),
            ));
        }
        if self.sector_count == 0 {
            return Err(ConfigError::Invalid("sector_count must be > 0".to_string()));
        }
        if self.lock_mode != "single-task" && self.lock_mode != "mutual" {
            return Err(ConfigError::Invalid(format!(
                "lock_mode must be 'single-task' or 'mutual', got '{}'",
                self.lock_mode
            )));
        }
        Ok(())
    }

    /// Locking discipline selected by `lock_mode`.
    pub fn lock_discipline(&self) -> LockDiscipline {
        if self.lock_mode == "mutual" {
            LockDiscipline::Mutual
        } else {
            LockDiscipline::SingleTask
        }
    }

    /// Volume capacity implied by the configured geometry.
    pub fn capacity(&self) -> u64 {
        self.sector_size as u64 * self.sector_count
    }
}
