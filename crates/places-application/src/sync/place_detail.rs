use super::{SyncContext, ViewLifetime};
use places_core::error::{PlacesError, Result};
use places_core::place::{Place, PlaceEditForm, PlaceId};
use places_core::review::{Review, ReviewForm};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const REVIEW_ADDED: &str = "Review added successfully!";
pub const REVIEW_FAILED: &str = "Failed to add review. Please try again.";
pub const PLACE_UPDATED: &str = "Place updated successfully";
pub const PLACE_UPDATE_FAILED: &str = "Failed to update place. Please try again.";

/// State of the place view.
#[derive(Debug, Clone, Default)]
pub struct PlaceDetailState {
    pub place_id: Option<PlaceId>,
    pub place: Option<Place>,
    pub reviews: Vec<Review>,
    /// The loaded place as a one-element sequence for the map. Replaced by
    /// a new allocation on every successful fetch.
    pub place_markers: Arc<[Place]>,
    pub loading: bool,
    pub last_error: Option<PlacesError>,
    /// Edit buffer, present while in edit mode.
    pub edit: Option<PlaceEditForm>,
    /// Review form, present while open.
    pub review_form: Option<ReviewForm>,
}

pub struct PlaceDetailController {
    ctx: SyncContext,
    lifetime: ViewLifetime,
    state: Arc<RwLock<PlaceDetailState>>,
}

impl PlaceDetailController {
    pub fn new(ctx: SyncContext) -> Self {
        Self {
            ctx,
            lifetime: ViewLifetime::new(),
            state: Arc::new(RwLock::new(PlaceDetailState::default())),
        }
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub async fn snapshot(&self) -> PlaceDetailState {
        self.state.read().await.clone()
    }

    /// Fetches the place and its reviews concurrently.
    ///
    /// On failure the previously loaded place and reviews stay visible.
    pub async fn load(&self, id: PlaceId) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.place_id = Some(id);
            state.loading = true;
        }

        let api = self.ctx.api().clone();
        let fetch = async { tokio::join!(api.get_place(id), api.get_reviews(id)) };
        let Some((place, reviews)) = self.lifetime.run(fetch).await else {
            tracing::debug!("[PlaceDetail] Unmounted while loading place {}", id);
            return Ok(());
        };

        let mut state = self.state.write().await;
        state.loading = false;
        match (place, reviews) {
            (Ok(place), Ok(reviews)) => {
                state.place_markers = Arc::from(vec![place.clone()]);
                state.place = Some(place);
                state.reviews = reviews;
                state.last_error = None;
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("[PlaceDetail] Failed to load place {}: {}", id, e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Re-fetches only the place record.
    async fn refresh_place(&self, id: PlaceId) -> Result<()> {
        let api = self.ctx.api().clone();
        let Some(result) = self.lifetime.run(api.get_place(id)).await else {
            return Ok(());
        };

        let mut state = self.state.write().await;
        match result {
            Ok(place) => {
                state.place_markers = Arc::from(vec![place.clone()]);
                state.place = Some(place);
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("[PlaceDetail] Failed to refresh place {}: {}", id, e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn loaded_id(&self) -> Result<PlaceId> {
        self.state
            .read()
            .await
            .place_id
            .ok_or_else(|| PlacesError::validation("No place is loaded"))
    }

    // ============================================================================
    // Edit mode
    // ============================================================================

    /// Enters edit mode with a buffer seeded from the last-known place.
    pub async fn begin_edit(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let form = state
            .place
            .as_ref()
            .map(PlaceEditForm::from_place)
            .ok_or_else(|| PlacesError::validation("No place is loaded"))?;
        state.edit = Some(form);
        Ok(())
    }

    /// Applies `change` to the edit buffer. Returns false outside edit mode.
    pub async fn edit<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut PlaceEditForm),
    {
        match self.state.write().await.edit.as_mut() {
            Some(form) => {
                change(form);
                true
            }
            None => false,
        }
    }

    /// Leaves edit mode without any network call.
    pub async fn cancel_edit(&self) {
        self.state.write().await.edit = None;
    }

    /// Sends the whole edit buffer, then re-fetches the place.
    ///
    /// The buffer is kept on failure so the user can retry.
    pub async fn submit_edit(&self) -> Result<()> {
        let id = self.loaded_id().await?;
        let update = self
            .state
            .read()
            .await
            .edit
            .as_ref()
            .map(PlaceEditForm::to_update)
            .ok_or_else(|| PlacesError::validation("Not in edit mode"))?;

        self.ctx
            .mutate(
                &self.lifetime,
                Some(PLACE_UPDATED),
                PLACE_UPDATE_FAILED,
                move |api, credential| async move {
                    api.update_place(&credential, id, &update).await
                },
            )
            .await?;

        if !self.lifetime.is_alive() {
            return Ok(());
        }
        self.state.write().await.edit = None;
        self.refresh_place(id).await
    }

    // ============================================================================
    // Reviews
    // ============================================================================

    /// Opens an empty review form with the default score.
    pub async fn open_review_form(&self) {
        self.state.write().await.review_form = Some(ReviewForm::default());
    }

    pub async fn close_review_form(&self) {
        self.state.write().await.review_form = None;
    }

    /// Posts a review by the current user, then re-fetches place and reviews.
    pub async fn submit_review(&self, text: &str, score: u8) -> Result<()> {
        let id = self.loaded_id().await?;
        let form = ReviewForm::new(text, score);
        self.state.write().await.review_form = Some(form.clone());

        let credential = self.ctx.session().credential().await?;
        let review = match form.to_new_review(id, credential.subject_id()) {
            Ok(review) => review,
            Err(e) => {
                self.ctx.notifier().error(e.user_message(REVIEW_FAILED));
                return Err(e);
            }
        };

        self.ctx
            .mutate(
                &self.lifetime,
                Some(REVIEW_ADDED),
                REVIEW_FAILED,
                move |api, credential| async move { api.add_review(&credential, &review).await },
            )
            .await?;

        if !self.lifetime.is_alive() {
            return Ok(());
        }
        self.state.write().await.review_form = None;
        self.load(id).await
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
