use serde::{Deserialize, Serialize};

use crate::map::Coordinates;
use crate::serde_util::null_as_default;

pub type PlaceId = i64;

/// A place record. The server is the source of truth.
///
/// Endpoints return different subsets of these fields (search results carry
/// no rating, the update response carries no coordinates), so everything but
/// the id defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    /// Identifier assigned by the map provider the place was captured from.
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_hours: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_reviews: u32,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Category names as shown in the details panel.
    pub fn category_label(&self) -> String {
        self.category.join(", ")
    }

    pub fn has_rating(&self) -> bool {
        self.total_reviews > 0 && self.average_rating > 0.0
    }
}
