//! Headless map provider.
//!
//! Keeps map instances in memory and logs what a real widget would draw.
//! The CLI prints the resulting marker table after a view renders.

use places_core::error::{PlacesError, Result};
use places_core::map::{Coordinates, MapContainer, MapHandle, MapMarker, MapProvider};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub struct MapInstance {
    pub container: MapContainer,
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Default)]
pub struct ConsoleMapProvider {
    next_handle: AtomicU64,
    instances: Mutex<HashMap<MapHandle, MapInstance>>,
}

impl ConsoleMapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a live instance, if `handle` has not been destroyed.
    pub fn instance(&self, handle: MapHandle) -> Option<MapInstance> {
        self.lock().get(&handle).cloned()
    }

    /// Number of instances that have been created and not destroyed.
    pub fn live_instances(&self) -> usize {
        self.lock().len()
    }

    /// Renders the markers of an instance as plain text lines.
    pub fn describe(&self, handle: MapHandle) -> Vec<String> {
        let Some(instance) = self.instance(handle) else {
            return Vec::new();
        };
        instance
            .markers
            .iter()
            .map(|m| {
                format!(
                    "#{} ({:.6}, {:.6}) {}",
                    m.place_id, m.coordinates.latitude, m.coordinates.longitude, m.balloon
                )
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<MapHandle, MapInstance>> {
        self.instances.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MapProvider for ConsoleMapProvider {
    fn init(&self, container: &MapContainer, center: Coordinates, zoom: u8) -> Result<MapHandle> {
        let handle = MapHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        tracing::debug!(
            "[ConsoleMap] init {:?} in '{}' at ({}, {}) zoom {}",
            handle,
            container,
            center.latitude,
            center.longitude,
            zoom
        );
        self.lock().insert(
            handle,
            MapInstance {
                container: container.clone(),
                center,
                zoom,
                markers: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn add_markers(&self, handle: MapHandle, markers: &[MapMarker]) -> Result<()> {
        let mut instances = self.lock();
        let instance = instances
            .get_mut(&handle)
            .ok_or_else(|| PlacesError::map(format!("map {:?} is not initialized", handle)))?;
        tracing::debug!("[ConsoleMap] {:?} +{} markers", handle, markers.len());
        instance.markers.extend_from_slice(markers);
        Ok(())
    }

    fn destroy(&self, handle: MapHandle) {
        if self.lock().remove(&handle).is_some() {
            tracing::debug!("[ConsoleMap] destroyed {:?}", handle);
        }
    }
}
