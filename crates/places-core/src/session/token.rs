//! Decoding of backend-issued tokens.
//!
//! The backend signs a JWT carrying `user_id` and `exp`. The client only reads
//! the payload segment; signature checks stay on the server.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Session, UserId};
use crate::error::{PlacesError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    /// Expiry as unix seconds.
    pub exp: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Result<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .ok_or_else(|| PlacesError::InvalidToken(format!("exp out of range: {}", self.exp)))
    }
}

/// Decodes `token` into a [`Session`].
///
/// Fails with [`PlacesError::InvalidToken`] when the token is not three
/// dot-separated segments, the payload is not base64url JSON, or the claims
/// are missing.
pub fn decode_token(token: &str) -> Result<Session> {
    let token = token.trim();
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(PlacesError::InvalidToken("expected three segments".into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| PlacesError::InvalidToken(format!("payload is not base64url: {}", e)))?;
    let claims: TokenClaims = serde_json::from_slice(&bytes)
        .map_err(|e| PlacesError::InvalidToken(format!("unexpected claims: {}", e)))?;

    Ok(Session {
        token: token.to_string(),
        subject_id: claims.user_id,
        expires_at: claims.expires_at()?,
    })
}
