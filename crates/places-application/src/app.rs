//! Composition root shared by the shells.

use crate::map::{MarkerAdapter, MarkerLabel, PlaceCaptureService};
use crate::notify::Notifier;
use crate::session::{RegistrationService, SessionManager};
use crate::sync::{
    CatalogController, ListDetailController, ListsController, PlaceDetailController, SyncContext,
};
use places_core::api::PlacesApi;
use places_core::config::ClientConfig;
use places_core::error::Result;
use places_core::map::MapProvider;
use places_core::notice::Notice;
use places_core::session::TokenStore;
use places_infrastructure::HttpPlacesApi;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Wires the session manager, the backend gateway and the notifier, and
/// hands out one controller per view.
pub struct PlacesApp {
    config: ClientConfig,
    api: Arc<dyn PlacesApi>,
    session: Arc<SessionManager>,
    notifier: Notifier,
}

impl PlacesApp {
    /// Builds the app around an explicit gateway.
    pub fn new(
        config: ClientConfig,
        api: Arc<dyn PlacesApi>,
        store: Arc<dyn TokenStore>,
    ) -> (Self, UnboundedReceiver<Notice>) {
        let (notifier, notices) = Notifier::channel();
        let session = Arc::new(SessionManager::new(api.clone(), store, notifier.clone()));
        let app = Self {
            config,
            api,
            session,
            notifier,
        };
        (app, notices)
    }

    /// Builds the app against the HTTP backend named in `config`.
    pub fn from_config(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<(Self, UnboundedReceiver<Notice>)> {
        config.validate()?;
        let api = Arc::new(HttpPlacesApi::new(&config)?);
        tracing::info!("[PlacesApp] Backend: {}", api.base_url());
        Ok(Self::new(config, api, store))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn sync_context(&self) -> SyncContext {
        SyncContext::new(self.api.clone(), self.session.clone(), self.notifier.clone())
    }

    pub fn registration(&self) -> RegistrationService {
        RegistrationService::new(self.api.clone())
    }

    pub fn catalog(&self) -> CatalogController {
        CatalogController::new(self.sync_context(), self.config.page_size)
    }

    pub fn place_detail(&self) -> PlaceDetailController {
        PlaceDetailController::new(self.sync_context())
    }

    pub fn list_detail(&self) -> ListDetailController {
        ListDetailController::new(self.sync_context())
    }

    pub fn lists(&self) -> ListsController {
        ListsController::new(self.sync_context())
    }

    pub fn capture(&self) -> PlaceCaptureService {
        PlaceCaptureService::new(self.api.clone(), self.notifier.clone())
    }

    /// Map of the place view: one marker labelled with the place name.
    pub fn place_map(&self, provider: Arc<dyn MapProvider>) -> MarkerAdapter {
        MarkerAdapter::new(provider, MarkerLabel::Name, self.config.map.place_zoom)
    }

    /// Map of the list view: one marker per place with its rating.
    pub fn list_map(&self, provider: Arc<dyn MapProvider>) -> MarkerAdapter {
        MarkerAdapter::new(provider, MarkerLabel::Rating, self.config.map.list_zoom)
    }
}
