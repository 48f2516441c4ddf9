use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Place record extracted from a map search selection, ready to be persisted
/// through `POST /api/place-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub address: String,
    pub categories: Vec<String>,
    pub work_hours: String,
    pub phone: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

fn text_at(value: &Value, pointer: &str) -> String {
    match value.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_at(value: &Value, pointer: &str) -> f64 {
    value.pointer(pointer).and_then(Value::as_f64).unwrap_or_default()
}

/// Extracts a [`PlaceCandidate`] from a search-result selection.
///
/// Expects the widget's result shape: `properties` (`id`, `name`,
/// `description`, `url`, `companyMetaData` with `Categories`, `Hours`,
/// `Phones`) and `geometry.coordinates` as `[lon, lat]`. Every missing
/// or mistyped field degrades to an empty value.
pub fn extract_candidate(result: &Value) -> PlaceCandidate {
    let categories = result
        .pointer("/properties/companyMetaData/Categories")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|c| c.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PlaceCandidate {
        place_id: text_at(result, "/properties/id"),
        display_name: text_at(result, "/properties/name"),
        lat: number_at(result, "/geometry/coordinates/1"),
        lon: number_at(result, "/geometry/coordinates/0"),
        address: text_at(result, "/properties/description"),
        categories,
        work_hours: text_at(result, "/properties/companyMetaData/Hours/text"),
        phone: text_at(result, "/properties/companyMetaData/Phones/0/formatted"),
        url: text_at(result, "/properties/url"),
        description: String::new(),
    }
}
