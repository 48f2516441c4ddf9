//! Map search selection and capture of selected places.

use crate::notify::Notifier;
use places_core::api::{PLACE_EXISTS_STATUS, PlacesApi};
use places_core::error::{PlacesError, Result};
use places_core::map::{PlaceCandidate, extract_candidate};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

pub const SAVE_FAILED: &str = "Error saving place";

/// The place currently selected in the map's search control.
#[derive(Debug)]
pub struct SearchSelection {
    tx: watch::Sender<Option<PlaceCandidate>>,
}

impl Default for SearchSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSelection {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Extracts a candidate from a raw search result and publishes it.
    pub fn select(&self, result: &Value) -> PlaceCandidate {
        let candidate = extract_candidate(result);
        tracing::debug!(
            "[SearchSelection] Selected '{}' ({})",
            candidate.display_name,
            candidate.place_id
        );
        self.tx.send_replace(Some(candidate.clone()));
        candidate
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn current(&self) -> Option<PlaceCandidate> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PlaceCandidate>> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Stored now; carries the server message.
    Saved(String),
    /// The backend already knew the place; carries the server message.
    AlreadyExists(String),
}

/// Persists selected places through `POST /api/place-data`.
pub struct PlaceCaptureService {
    api: Arc<dyn PlacesApi>,
    notifier: Notifier,
}

impl PlaceCaptureService {
    pub fn new(api: Arc<dyn PlacesApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    /// Saves `candidate` and publishes the outcome as a notice.
    pub async fn save(&self, candidate: &PlaceCandidate) -> Result<CaptureOutcome> {
        match self.api.save_place_data(candidate).await {
            Ok(ack) if ack.status == "success" => {
                self.notifier.success(ack.message.clone());
                Ok(CaptureOutcome::Saved(ack.message))
            }
            Ok(ack) if ack.status == PLACE_EXISTS_STATUS => {
                self.notifier.info(ack.message.clone());
                Ok(CaptureOutcome::AlreadyExists(ack.message))
            }
            Ok(ack) => {
                tracing::warn!("[PlaceCapture] Unexpected status '{}'", ack.status);
                self.notifier.error(SAVE_FAILED);
                Err(PlacesError::internal(format!(
                    "unexpected capture status '{}'",
                    ack.status
                )))
            }
            Err(PlacesError::Server {
                status: 409,
                message,
            }) => {
                let message = message.unwrap_or_default();
                self.notifier.info(message.clone());
                Ok(CaptureOutcome::AlreadyExists(message))
            }
            Err(e) => {
                tracing::error!("[PlaceCapture] Error saving place: {}", e);
                self.notifier.error(SAVE_FAILED);
                Err(e)
            }
        }
    }

    /// Saves whatever `selection` currently holds.
    pub async fn save_selection(&self, selection: &SearchSelection) -> Result<CaptureOutcome> {
        let candidate = selection
            .current()
            .ok_or_else(|| PlacesError::validation("No place is selected"))?;
        self.save(&candidate).await
    }
}
