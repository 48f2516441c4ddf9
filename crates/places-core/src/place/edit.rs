use serde::{Deserialize, Serialize};

use super::model::Place;

/// Splits a comma-separated form field into trimmed, non-empty items.
pub fn split_list_field(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Local edit buffer of the place view.
///
/// Seeded from the last-known server entity; list fields are edited as
/// comma-separated text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceEditForm {
    pub name: String,
    pub address: String,
    pub category: String,
    pub description: String,
    pub work_hours: String,
    pub website: String,
    pub phone: String,
}

impl PlaceEditForm {
    pub fn from_place(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            address: place.address.clone(),
            category: place.category_label(),
            description: place.description.clone(),
            work_hours: place.work_hours.clone(),
            website: place.website.clone(),
            phone: place.phone.clone(),
        }
    }

    /// Builds the full update payload from the buffer.
    pub fn to_update(&self) -> PlaceUpdate {
        PlaceUpdate {
            name: self.name.clone(),
            address: self.address.clone(),
            category: split_list_field(&self.category),
            description: self.description.clone(),
            work_hours: self.work_hours.clone(),
            website: self.website.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Body of `PUT /api/place/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaceUpdate {
    pub name: String,
    pub address: String,
    pub category: Vec<String>,
    pub description: String,
    pub work_hours: String,
    pub website: String,
    pub phone: String,
}
