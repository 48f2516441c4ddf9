//! Serde helpers for backend payloads.

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` like a missing field.
///
/// The backend stores most place columns as nullable, so `"phone": null`
/// shows up next to fully populated records.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
