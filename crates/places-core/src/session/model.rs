use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AuthScheme;

pub type UserId = i64;

/// Username and password as typed into the login or register form.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The authenticated-user context derived from a decoded token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub subject_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session expires at `expires_at` itself, not one tick later.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn credential(&self) -> Credential {
        Credential {
            token: self.token.clone(),
            subject_id: self.subject_id,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("subject_id", &self.subject_id)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// A token that was validated immediately before being handed out.
///
/// Only the session manager produces these; gateways attach them to
/// mutating requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    subject_id: UserId,
}

impl Credential {
    pub fn subject_id(&self) -> UserId {
        self.subject_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn authorization(&self, scheme: AuthScheme) -> String {
        scheme.header_value(&self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("subject_id", &self.subject_id)
            .finish_non_exhaustive()
    }
}
