use super::{SyncContext, ViewLifetime};
use places_core::error::{PlacesError, Result};
use places_core::list::{ListId, ListUser, PlaceList};
use places_core::place::{Place, PlaceId};
use places_core::session::UserId;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const PLACE_NOT_FOUND: &str = "Place not found";
pub const PLACE_ADDED: &str = "Place added successfully";
pub const PLACE_ADD_FAILED: &str = "Failed to add place. Please try again.";
pub const PLACE_DELETED: &str = "Place deleted successfully";
pub const PLACE_DELETE_FAILED: &str = "Failed to delete place. Please try again.";
pub const USER_ADDED: &str = "User added successfully";
pub const USER_ADD_FAILED: &str = "Failed to add user. Please try again.";
pub const USER_DELETED: &str = "User deleted successfully";
pub const USER_DELETE_FAILED: &str = "Failed to delete user. Please try again.";

/// State of the list view.
#[derive(Debug, Clone, Default)]
pub struct ListDetailState {
    pub list_id: Option<ListId>,
    pub list: Option<PlaceList>,
    /// Places of the list. A new allocation per fetch, which is what the
    /// map adapter watches.
    pub places: Arc<[Place]>,
    pub users: Vec<ListUser>,
    pub loading: bool,
    pub last_error: Option<PlacesError>,
}

pub struct ListDetailController {
    ctx: SyncContext,
    lifetime: ViewLifetime,
    state: Arc<RwLock<ListDetailState>>,
}

impl ListDetailController {
    pub fn new(ctx: SyncContext) -> Self {
        Self {
            ctx,
            lifetime: ViewLifetime::new(),
            state: Arc::new(RwLock::new(ListDetailState::default())),
        }
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub async fn snapshot(&self) -> ListDetailState {
        self.state.read().await.clone()
    }

    /// Fetches the list, its places and its members concurrently.
    pub async fn load(&self, id: ListId) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.list_id = Some(id);
            state.loading = true;
        }

        let api = self.ctx.api().clone();
        let fetch = async {
            tokio::join!(
                api.get_list(id),
                api.get_list_places(id),
                api.get_list_users(id)
            )
        };
        let Some((list, places, users)) = self.lifetime.run(fetch).await else {
            tracing::debug!("[ListDetail] Unmounted while loading list {}", id);
            return Ok(());
        };

        let mut state = self.state.write().await;
        state.loading = false;
        match (list, places, users) {
            (Ok(list), Ok(places), Ok(users)) => {
                state.list = Some(list);
                state.places = Arc::from(places);
                state.users = users;
                state.last_error = None;
                Ok(())
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                tracing::error!("[ListDetail] Failed to load list {}: {}", id, e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn refresh_places(&self, id: ListId) -> Result<()> {
        let api = self.ctx.api().clone();
        let Some(result) = self.lifetime.run(api.get_list_places(id)).await else {
            return Ok(());
        };
        let mut state = self.state.write().await;
        match result {
            Ok(places) => {
                state.places = Arc::from(places);
                Ok(())
            }
            Err(e) => {
                tracing::error!("[ListDetail] Failed to refresh places of list {}: {}", id, e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn refresh_users(&self, id: ListId) -> Result<()> {
        let api = self.ctx.api().clone();
        let Some(result) = self.lifetime.run(api.get_list_users(id)).await else {
            return Ok(());
        };
        let mut state = self.state.write().await;
        match result {
            Ok(users) => {
                state.users = users;
                Ok(())
            }
            Err(e) => {
                tracing::error!("[ListDetail] Failed to refresh users of list {}: {}", id, e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn loaded_id(&self) -> Result<ListId> {
        self.state
            .read()
            .await
            .list_id
            .ok_or_else(|| PlacesError::validation("No list is loaded"))
    }

    /// Looks a place up by name and adds the first match to the list.
    ///
    /// No match publishes "Place not found" and writes nothing. Without a
    /// valid session nothing is looked up either.
    pub async fn add_place_by_name(&self, name: &str) -> Result<()> {
        let id = self.loaded_id().await?;
        self.ctx.session().credential().await?;

        let api = self.ctx.api().clone();
        let Some(found) = self.lifetime.run(api.search_places(Some(name.trim()))).await else {
            return Ok(());
        };
        let place = match found {
            Ok(places) => places.into_iter().next(),
            Err(e) => {
                tracing::warn!("[ListDetail] Place lookup failed: {}", e);
                self.ctx.notifier().error(PLACE_ADD_FAILED);
                return Err(e);
            }
        };
        let Some(place) = place else {
            self.ctx.notifier().error(PLACE_NOT_FOUND);
            return Err(PlacesError::not_found("Place", name.trim()));
        };

        let place_id = place.id;
        self.ctx
            .mutate(
                &self.lifetime,
                Some(PLACE_ADDED),
                PLACE_ADD_FAILED,
                move |api, credential| async move {
                    api.add_list_place(&credential, id, place_id).await
                },
            )
            .await?;
        self.refresh_places(id).await
    }

    pub async fn remove_place(&self, place_id: PlaceId) -> Result<()> {
        let id = self.loaded_id().await?;
        self.ctx
            .mutate(
                &self.lifetime,
                Some(PLACE_DELETED),
                PLACE_DELETE_FAILED,
                move |api, credential| async move {
                    api.remove_list_place(&credential, id, place_id).await
                },
            )
            .await?;
        self.refresh_places(id).await
    }

    /// Shares the list with `username`.
    pub async fn add_user(&self, username: &str) -> Result<()> {
        let id = self.loaded_id().await?;
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(PlacesError::validation("Username is required"));
        }
        self.ctx
            .mutate(
                &self.lifetime,
                Some(USER_ADDED),
                USER_ADD_FAILED,
                move |api, credential| async move {
                    api.add_list_user(&credential, id, &username).await
                },
            )
            .await?;
        self.refresh_users(id).await
    }

    pub async fn remove_user(&self, user_id: UserId) -> Result<()> {
        let id = self.loaded_id().await?;
        self.ctx
            .mutate(
                &self.lifetime,
                Some(USER_DELETED),
                USER_DELETE_FAILED,
                move |api, credential| async move {
                    api.remove_list_user(&credential, id, user_id).await
                },
            )
            .await?;
        self.refresh_users(id).await
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
