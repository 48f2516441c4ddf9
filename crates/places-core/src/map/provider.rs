use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::place::PlaceId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The hosting region a map instance is mounted into (a DOM id, a window...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapContainer(String);

impl MapContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle of a live map instance, issued by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub place_id: PlaceId,
    pub coordinates: Coordinates,
    /// Text of the marker's popup.
    pub balloon: String,
}

/// Narrow interface over an external map widget.
///
/// Calls happen on the UI thread; none of them block on the network.
pub trait MapProvider: Send + Sync {
    /// Creates a map instance inside `container`.
    fn init(&self, container: &MapContainer, center: Coordinates, zoom: u8) -> Result<MapHandle>;

    /// Adds markers to a live instance.
    fn add_markers(&self, handle: MapHandle, markers: &[MapMarker]) -> Result<()>;

    /// Tears an instance down. Unknown handles are ignored.
    fn destroy(&self, handle: MapHandle);
}
