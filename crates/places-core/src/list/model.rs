use serde::{Deserialize, Serialize};

use crate::error::{PlacesError, Result};
use crate::serde_util::null_as_default;
use crate::session::UserId;

pub type ListId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaceList {
    pub id: ListId,
    #[serde(rename = "list_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Only present on endpoints that expose the owner.
    #[serde(rename = "id_user", default)]
    pub owner_id: Option<UserId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

/// A collaborator attached to a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListUser {
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

/// Body of `POST /api/lists`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewList {
    pub list_name: String,
}

impl NewList {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlacesError::validation("List name is required"));
        }
        Ok(Self {
            list_name: name.to_string(),
        })
    }
}
