//! Resource sync controllers.
//!
//! Each controller backs one view. Loads fan out concurrently and land in
//! view state only while the view is mounted. Writes take a freshly
//! validated credential, always run to completion, and are followed by a
//! re-fetch of the affected collection while the view is still mounted;
//! write responses never feed view state.
//!
//! # Module Structure
//!
//! - `lifetime`: cancellation scope of a mounted view
//! - `catalog`: all places, paged client-side
//! - `place_detail`: one place with its reviews, edit buffer and review form
//! - `list_detail`: one list with its places and members
//! - `lists`: lists owned by the current user

pub mod catalog;
pub mod lifetime;
pub mod list_detail;
pub mod lists;
pub mod place_detail;

pub use catalog::{CatalogController, CatalogState};
pub use lifetime::ViewLifetime;
pub use list_detail::{ListDetailController, ListDetailState};
pub use lists::{ListsController, ListsState};
pub use place_detail::{PlaceDetailController, PlaceDetailState};

use crate::notify::Notifier;
use crate::session::SessionManager;
use places_core::api::PlacesApi;
use places_core::error::Result;
use places_core::session::Credential;
use std::future::Future;
use std::sync::Arc;

/// Collaborators shared by every controller.
#[derive(Clone)]
pub struct SyncContext {
    api: Arc<dyn PlacesApi>,
    session: Arc<SessionManager>,
    notifier: Notifier,
}

impl SyncContext {
    pub fn new(api: Arc<dyn PlacesApi>, session: Arc<SessionManager>, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    pub fn api(&self) -> &Arc<dyn PlacesApi> {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Runs one authenticated write for the view owning `lifetime`.
    ///
    /// Aborts before any network call when no valid credential exists (the
    /// session manager has already published the notice). Once sent, the
    /// write is awaited to completion even if the view unmounts meanwhile;
    /// only the `success` or `failure` notice is skipped for a view that
    /// is gone.
    pub(crate) async fn mutate<F, Fut>(
        &self,
        lifetime: &ViewLifetime,
        success: Option<&str>,
        failure: &str,
        op: F,
    ) -> Result<()>
    where
        F: FnOnce(Arc<dyn PlacesApi>, Credential) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let credential = self.session.credential().await?;
        let result = op(self.api.clone(), credential).await;
        let alive = lifetime.is_alive();
        if !alive {
            tracing::debug!("[Sync] Write finished after the view unmounted");
        }

        match result {
            Ok(()) => {
                if let (true, Some(message)) = (alive, success) {
                    self.notifier.success(message);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Sync] Write failed: {}", e);
                if alive {
                    self.notifier.error(failure);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod scenarios_test;
