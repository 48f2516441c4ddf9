use super::{SyncContext, ViewLifetime};
use places_core::error::{PlacesError, Result};
use places_core::place::{Paginator, Place};
use std::sync::Arc;
use tokio::sync::RwLock;

/// State of the places catalog (the home view).
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub places: Arc<[Place]>,
    pub loading: bool,
    pub last_error: Option<PlacesError>,
    pager: Paginator,
}

impl CatalogState {
    fn new(page_size: usize) -> Self {
        Self {
            places: Arc::from(Vec::new()),
            loading: false,
            last_error: None,
            pager: Paginator::new(page_size),
        }
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.places.len())
    }

    pub fn page_items(&self) -> &[Place] {
        self.pager.slice(&self.places[..])
    }

    pub fn has_previous(&self) -> bool {
        self.pager.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.pager.has_next(self.places.len())
    }
}

/// Fetches every place once and pages through them locally.
pub struct CatalogController {
    ctx: SyncContext,
    lifetime: ViewLifetime,
    state: Arc<RwLock<CatalogState>>,
}

impl CatalogController {
    pub fn new(ctx: SyncContext, page_size: usize) -> Self {
        Self {
            ctx,
            lifetime: ViewLifetime::new(),
            state: Arc::new(RwLock::new(CatalogState::new(page_size))),
        }
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub async fn snapshot(&self) -> CatalogState {
        self.state.read().await.clone()
    }

    /// Loads the full catalog.
    pub async fn load(&self) -> Result<()> {
        self.fetch(None).await
    }

    /// Loads places whose name contains `name`, case-insensitively.
    pub async fn search(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return self.fetch(None).await;
        }
        self.fetch(Some(name)).await
    }

    async fn fetch(&self, name: Option<&str>) -> Result<()> {
        self.state.write().await.loading = true;

        let api = self.ctx.api().clone();
        let Some(result) = self.lifetime.run(api.search_places(name)).await else {
            return Ok(());
        };

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(places) => {
                tracing::debug!("[Catalog] Loaded {} places", places.len());
                state.places = Arc::from(places);
                state.pager.reset();
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("[Catalog] Failed to load places: {}", e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Moves to the next page; false on the last page.
    pub async fn next_page(&self) -> bool {
        let mut state = self.state.write().await;
        let total = state.places.len();
        state.pager.next(total)
    }

    /// Moves to the previous page; false on page 1.
    pub async fn previous_page(&self) -> bool {
        self.state.write().await.pager.previous()
    }

    /// Jumps to `page`, clamped to the available range.
    pub async fn go_to_page(&self, page: usize) {
        let mut state = self.state.write().await;
        let total = state.places.len();
        state.pager.reset();
        for _ in 1..page {
            if !state.pager.next(total) {
                break;
            }
        }
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
