//! File-backed token store.
//!
//! Persists the token as `{"token": "..."}` in `session.json`, the native
//! counterpart of the browser's local storage entry.

use async_trait::async_trait;
use places_core::error::{PlacesError, Result};
use places_core::session::{TOKEN_KEY, TokenStore};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::paths::PlacesPaths;

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the default location (`~/.config/places/session.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: PlacesPaths::new(None).session_file()?,
        })
    }

    /// Creates a store with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value: Value = serde_json::from_str(&content)?;
        match value.get(TOKEN_KEY) {
            Some(Value::String(token)) if !token.is_empty() => Ok(Some(token.clone())),
            Some(Value::Null) | None => Ok(None),
            Some(Value::String(_)) => Ok(None),
            Some(other) => Err(PlacesError::Serialization {
                format: "JSON".to_string(),
                message: format!("'{}' is not a string: {}", TOKEN_KEY, other),
            }),
        }
    }

    async fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut entries = Map::new();
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        let content = serde_json::to_string_pretty(&Value::Object(entries))?;
        tokio::fs::write(&self.path, content).await?;

        // The token is a bearer secret: user read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions).await?;
        }

        tracing::debug!("[FileTokenStore] Token saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("[FileTokenStore] Token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
