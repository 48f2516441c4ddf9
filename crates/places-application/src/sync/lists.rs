use super::{SyncContext, ViewLifetime};
use places_core::error::{PlacesError, Result};
use places_core::list::{NewList, PlaceList};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const LIST_CREATED: &str = "List created successfully";
pub const LIST_CREATE_FAILED: &str = "Failed to create list. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct ListsState {
    pub lists: Vec<PlaceList>,
    pub loading: bool,
    pub last_error: Option<PlacesError>,
}

/// Lists owned by the logged-in user.
pub struct ListsController {
    ctx: SyncContext,
    lifetime: ViewLifetime,
    state: Arc<RwLock<ListsState>>,
}

impl ListsController {
    pub fn new(ctx: SyncContext) -> Self {
        Self {
            ctx,
            lifetime: ViewLifetime::new(),
            state: Arc::new(RwLock::new(ListsState::default())),
        }
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub async fn snapshot(&self) -> ListsState {
        self.state.read().await.clone()
    }

    /// Fetches the user's lists. Needs a valid session.
    pub async fn load(&self) -> Result<()> {
        let credential = self.ctx.session().credential().await?;
        self.state.write().await.loading = true;

        let api = self.ctx.api().clone();
        let Some(result) = self.lifetime.run(api.get_lists(&credential)).await else {
            return Ok(());
        };

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(lists) => {
                state.lists = lists;
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("[Lists] Failed to load lists: {}", e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Creates a list, then re-fetches. Blank names never reach the network.
    pub async fn create(&self, name: &str) -> Result<()> {
        let list = match NewList::new(name) {
            Ok(list) => list,
            Err(e) => {
                self.ctx.notifier().error(e.user_message(LIST_CREATE_FAILED));
                return Err(e);
            }
        };

        self.ctx
            .mutate(
                &self.lifetime,
                Some(LIST_CREATED),
                LIST_CREATE_FAILED,
                move |api, credential| async move { api.create_list(&credential, &list).await },
            )
            .await?;
        if !self.lifetime.is_alive() {
            return Ok(());
        }
        self.load().await
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
