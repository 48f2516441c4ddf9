//! Token persistence port.

use async_trait::async_trait;

use crate::error::Result;

/// Key under which the token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Client-local storage for the single opaque token.
///
/// Implementations hold at most one token. `clear` on an empty store is
/// not an error.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the persisted token, `Ok(None)` when nothing is stored.
    async fn load(&self) -> Result<Option<String>>;

    /// Replaces the persisted token.
    async fn save(&self, token: &str) -> Result<()>;

    /// Removes the persisted token.
    async fn clear(&self) -> Result<()>;
}
