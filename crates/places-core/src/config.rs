use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlacesError;

pub const DEFAULT_BACKEND_URL: &str = "https://places-project-6i0r.onrender.com";

/// How a credential is rendered into the `Authorization` header.
///
/// One scheme is chosen per client and applied to every authenticated call.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// The bare token, which is what the backend decodes.
    #[default]
    Raw,
    /// `Bearer <token>`
    Bearer,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::Raw => write!(f, "raw"),
            AuthScheme::Bearer => write!(f, "bearer"),
        }
    }
}

impl FromStr for AuthScheme {
    type Err = PlacesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(AuthScheme::Raw),
            "bearer" => Ok(AuthScheme::Bearer),
            other => Err(PlacesError::config(format!("unknown auth scheme '{}'", other))),
        }
    }
}

/// Root client configuration, usually read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub backend_url: String,
    pub auth_scheme: AuthScheme,
    pub request_timeout_secs: u64,
    /// Items per page in the places catalog.
    pub page_size: usize,
    pub map: MapSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            auth_scheme: AuthScheme::default(),
            request_timeout_secs: 30,
            page_size: 5,
            map: MapSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Backend base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    /// Rejects values the rest of the client cannot work with.
    pub fn validate(&self) -> Result<(), PlacesError> {
        if self.backend_url.trim().is_empty() {
            return Err(PlacesError::config("backend_url must not be empty"));
        }
        if self.page_size == 0 {
            return Err(PlacesError::config("page_size must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MapSettings {
    /// Center of the search map when nothing is selected (Moscow).
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub search_zoom: u8,
    pub place_zoom: u8,
    pub list_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center_lat: 55.751426,
            default_center_lng: 37.618879,
            search_zoom: 13,
            place_zoom: 15,
            list_zoom: 12,
        }
    }
}
