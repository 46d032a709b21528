//! Configuration service implementation.
//!
//! Loads [`StallConfig`] from `config.toml` (default `~/.config/stall/config.toml`)
//! and caches it.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use stall_core::config::StallConfig;
use stall_core::error::{Result, StallError};

use crate::paths::StallPaths;

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<StallConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(StallPaths::default().config_file()?))
    }

    /// Creates a service reading an explicit file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn get_config(&self) -> Result<StallConfig> {
        {
            let cached = self
                .config
                .read()
                .map_err(|_| StallError::internal("config cache lock poisoned"))?;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut cached = self
            .config
            .write()
            .map_err(|_| StallError::internal("config cache lock poisoned"))?;
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.config.write() {
            *cached = None;
        }
    }

    fn load_config(&self) -> Result<StallConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                self.path.display()
            );
            return Ok(StallConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: StallConfig = toml::from_str(&content)?;
        tracing::info!("[ConfigService] Loaded config from {}", self.path.display());
        Ok(config)
    }
}
