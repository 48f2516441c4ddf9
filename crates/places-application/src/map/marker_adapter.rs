use places_core::error::Result;
use places_core::map::{MapContainer, MapHandle, MapMarker, MapProvider};
use places_core::place::{Place, PlaceId};
use std::collections::HashMap;
use std::sync::Arc;

/// Lifecycle of the map widget behind a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterPhase {
    Uninitialized,
    Ready,
    Destroyed,
}

/// What a marker's balloon shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerLabel {
    /// The place name (place view).
    Name,
    /// Name plus rating summary (list view).
    Rating,
}

impl MarkerLabel {
    pub fn balloon(&self, place: &Place) -> String {
        match self {
            MarkerLabel::Name => place.name.clone(),
            MarkerLabel::Rating => format!("{}\n{}", place.name, rating_summary(place)),
        }
    }
}

/// `Rating: 4.5 (3 reviews)`, or `Rating: N/A (0 reviews)` without reviews.
pub fn rating_summary(place: &Place) -> String {
    if place.has_rating() {
        let rating = format!("{:.1}", place.average_rating);
        let rating = rating.trim_end_matches(".0");
        format!("Rating: {} ({} reviews)", rating, place.total_reviews)
    } else {
        format!("Rating: N/A ({} reviews)", place.total_reviews)
    }
}

/// Keeps one map instance in step with a sequence of places.
///
/// The instance is rebuilt only when the sequence is replaced by a new
/// allocation; handing in the same `Arc` again is a no-op. The adapter
/// destroys its instance on [`MarkerAdapter::unmount`] or when dropped.
pub struct MarkerAdapter {
    provider: Arc<dyn MapProvider>,
    label: MarkerLabel,
    zoom: u8,
    phase: AdapterPhase,
    handle: Option<MapHandle>,
    rendered: Option<Arc<[Place]>>,
    markers: HashMap<PlaceId, MapMarker>,
}

impl MarkerAdapter {
    pub fn new(provider: Arc<dyn MapProvider>, label: MarkerLabel, zoom: u8) -> Self {
        Self {
            provider,
            label,
            zoom,
            phase: AdapterPhase::Uninitialized,
            handle: None,
            rendered: None,
            markers: HashMap::new(),
        }
    }

    pub fn phase(&self) -> AdapterPhase {
        self.phase
    }

    pub fn handle(&self) -> Option<MapHandle> {
        self.handle
    }

    /// Markers currently on the map, keyed by place id.
    pub fn markers(&self) -> &HashMap<PlaceId, MapMarker> {
        &self.markers
    }

    /// Brings the map in line with `places`.
    ///
    /// Needs a container and at least one place to build an instance,
    /// centred on the first place. An empty sequence tears the instance
    /// down. Ignored once destroyed.
    pub fn render(
        &mut self,
        container: Option<&MapContainer>,
        places: &Arc<[Place]>,
    ) -> Result<()> {
        match self.phase {
            AdapterPhase::Destroyed => {
                tracing::debug!("[MarkerAdapter] Render after unmount ignored");
                Ok(())
            }
            AdapterPhase::Uninitialized => match container {
                Some(container) if !places.is_empty() => self.build(container, places),
                _ => Ok(()),
            },
            AdapterPhase::Ready => {
                let unchanged = self
                    .rendered
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, places));
                if unchanged {
                    return Ok(());
                }

                self.teardown();
                self.phase = AdapterPhase::Uninitialized;
                match container {
                    Some(container) if !places.is_empty() => self.build(container, places),
                    _ => Ok(()),
                }
            }
        }
    }

    /// Destroys the instance, if any. Idempotent.
    pub fn unmount(&mut self) {
        self.teardown();
        self.phase = AdapterPhase::Destroyed;
    }

    fn build(&mut self, container: &MapContainer, places: &Arc<[Place]>) -> Result<()> {
        let Some(first) = places.first() else {
            return Ok(());
        };

        let handle = self
            .provider
            .init(container, first.coordinates(), self.zoom)?;
        self.handle = Some(handle);
        self.phase = AdapterPhase::Ready;
        self.rendered = Some(places.clone());

        let markers: Vec<MapMarker> = places
            .iter()
            .map(|place| MapMarker {
                place_id: place.id,
                coordinates: place.coordinates(),
                balloon: self.label.balloon(place),
            })
            .collect();

        if let Err(e) = self.provider.add_markers(handle, &markers) {
            tracing::error!("[MarkerAdapter] Failed to add markers: {}", e);
            self.teardown();
            self.phase = AdapterPhase::Uninitialized;
            return Err(e);
        }

        tracing::debug!(
            "[MarkerAdapter] {:?} ready with {} markers in '{}'",
            handle,
            markers.len(),
            container
        );
        self.markers = markers.into_iter().map(|m| (m.place_id, m)).collect();
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.provider.destroy(handle);
        }
        self.rendered = None;
        self.markers.clear();
    }
}

impl Drop for MarkerAdapter {
    fn drop(&mut self) {
        self.unmount();
    }
}
