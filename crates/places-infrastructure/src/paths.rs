//! Unified path management for places client files.
//!
//! ```text
//! ~/.config/places/        # Config directory (dirs::config_dir)
//! ├── config.toml          # Client configuration
//! └── session.json         # Persisted token ({"token": "..."})
//! ```

use std::path::{Path, PathBuf};

use places_core::error::{PlacesError, Result};

const APP_DIR: &str = "places";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.json";

/// Resolves the client's files, either under the platform config directory
/// or under an explicit base directory (tests, portable installs).
#[derive(Debug, Clone, Default)]
pub struct PlacesPaths {
    base: Option<PathBuf>,
}

impl PlacesPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the config directory (e.g. `~/.config/places/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| PlacesError::config("Cannot find config directory")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    /// Returns the file holding the persisted token.
    pub fn session_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(SESSION_FILE))
    }
}
