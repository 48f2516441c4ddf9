//! Error types for the places client.

use thiserror::Error;

/// Message shown when the backend could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error or server not responding";

/// Message shown when an action is aborted because the credential is unusable.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// A shared error type for the whole client.
///
/// Variants follow the three failure families the views care about:
/// transport failures, server-reported failures and authentication failures.
/// Everything else is local (validation, storage, configuration).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacesError {
    /// No response from the backend (connection refused, timeout, DNS...).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status.
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The persisted credential is missing, undecodable or expired.
    #[error("Session expired")]
    SessionExpired,

    /// A token could not be decoded into claims.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Input rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error (token file, config file)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Map widget failure
    #[error("Map error: {0}")]
    Map(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlacesError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a Server error
    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Map error
    pub fn map(message: impl Into<String>) -> Self {
        Self::Map(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Server { status: 404, .. })
    }

    /// HTTP status reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Renders the message a view shows for this error.
    ///
    /// Server messages win when present; `fallback` is the per-action text
    /// used when the payload carried nothing usable.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            Self::SessionExpired | Self::InvalidToken(_) => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PlacesError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PlacesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PlacesError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PlacesError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PlacesError>`.
pub type Result<T> = std::result::Result<T, PlacesError>;
