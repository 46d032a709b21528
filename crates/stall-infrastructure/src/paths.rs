//! Unified path management for stall configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/stall/             # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/stall/        # Data directory
//! └── orders/                  # Submitted orders, one JSON file each
//! ```

use std::path::PathBuf;

use stall_core::error::{Result, StallError};

const APP_DIR: &str = "stall";

/// Path resolution for stall, rooted at the platform config/data dirs or at
/// an explicit base directory (tests).
#[derive(Debug, Clone, Default)]
pub struct StallPaths {
    base_dir: Option<PathBuf>,
}

impl StallPaths {
    /// Creates a resolver. With `base_dir`, every path lives under it.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the configuration directory (e.g. `~/.config/stall/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| StallError::config("Cannot find config directory")),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/stall/`).
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| StallError::config("Cannot find data directory")),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the directory holding submitted orders.
    pub fn orders_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("orders"))
    }
}
