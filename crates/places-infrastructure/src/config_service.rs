//! Configuration service implementation.
//!
//! Loads the client configuration from `~/.config/places/config.toml`
//! and applies environment overrides on top.

use crate::paths::PlacesPaths;
use places_core::config::ClientConfig;
use places_core::error::Result;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Overrides `backend_url`.
pub const ENV_BACKEND_URL: &str = "PLACES_BACKEND_URL";
/// Overrides `auth_scheme` (`raw` or `bearer`).
pub const ENV_AUTH_SCHEME: &str = "PLACES_AUTH_SCHEME";

/// Configuration service that loads and caches the client configuration.
///
/// A missing file is not an error: defaults apply. A malformed file is
/// reported by [`ConfigService::load`] and replaced by defaults in
/// [`ConfigService::get_config`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file.
    pub fn new() -> Self {
        Self {
            path: PlacesPaths::new(None).config_file().ok(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` (for testing or `--config`).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it on first access.
    pub fn get_config(&self) -> ClientConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load().unwrap_or_else(|e| {
            tracing::warn!("[ConfigService] Falling back to defaults: {}", e);
            apply_env_overrides(ClientConfig::default(), |key| std::env::var(key).ok())
        });

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Reads and validates the config file without touching the cache.
    pub fn load(&self) -> Result<ClientConfig> {
        let from_file = match &self.path {
            Some(path) if path.exists() => {
                tracing::debug!("[ConfigService] Loading {}", path.display());
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            _ => ClientConfig::default(),
        };

        let config = apply_env_overrides(from_file, |key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `PLACES_*` overrides read through `lookup`.
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        config.backend_url = url;
    }
    if let Some(scheme) = lookup(ENV_AUTH_SCHEME) {
        match scheme.parse() {
            Ok(parsed) => config.auth_scheme = parsed,
            Err(e) => tracing::warn!("[ConfigService] Ignoring {}: {}", ENV_AUTH_SCHEME, e),
        }
    }
    config
}
