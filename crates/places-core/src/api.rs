//! Backend gateway port.
//!
//! Mirrors the REST endpoints one method per call. Mutations return no
//! entity state: views re-query after a successful write.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::list::{ListId, ListUser, NewList, PlaceList};
use crate::map::PlaceCandidate;
use crate::place::{Place, PlaceId, PlaceUpdate};
use crate::review::{NewReview, Review};
use crate::session::{Credential, Credentials, UserId};

/// Status the backend reports when a captured place is already stored.
pub const PLACE_EXISTS_STATUS: &str = "place_id exists";

/// `{ status, message }` acknowledgement of `POST /api/place-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// An abstract gateway to the places backend.
///
/// Methods taking a [`Credential`] are the authenticated endpoints; the
/// implementation renders it into the `Authorization` header.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// `POST /api/register`, returns the server message.
    async fn register(&self, credentials: &Credentials) -> Result<String>;

    /// `POST /api/login`, returns the issued token.
    async fn login(&self, credentials: &Credentials) -> Result<String>;

    /// `GET /api/places`, filtered by a case-insensitive name fragment when given.
    async fn search_places(&self, name: Option<&str>) -> Result<Vec<Place>>;

    /// `GET /api/place/:id`
    async fn get_place(&self, id: PlaceId) -> Result<Place>;

    /// `PUT /api/place/:id`
    async fn update_place(
        &self,
        credential: &Credential,
        id: PlaceId,
        update: &PlaceUpdate,
    ) -> Result<()>;

    /// `GET /api/reviews/:id`
    async fn get_reviews(&self, place_id: PlaceId) -> Result<Vec<Review>>;

    /// `POST /api/review`
    async fn add_review(&self, credential: &Credential, review: &NewReview) -> Result<()>;

    /// `GET /api/lists`, the lists of the credential's user.
    async fn get_lists(&self, credential: &Credential) -> Result<Vec<PlaceList>>;

    /// `POST /api/lists`
    async fn create_list(&self, credential: &Credential, list: &NewList) -> Result<()>;

    /// `GET /api/lists/:id`
    async fn get_list(&self, id: ListId) -> Result<PlaceList>;

    /// `GET /api/lists/:id/places`
    async fn get_list_places(&self, list_id: ListId) -> Result<Vec<Place>>;

    /// `POST /api/lists/:id/places`
    async fn add_list_place(
        &self,
        credential: &Credential,
        list_id: ListId,
        place_id: PlaceId,
    ) -> Result<()>;

    /// `DELETE /api/lists/:id/places/:placeId`
    async fn remove_list_place(
        &self,
        credential: &Credential,
        list_id: ListId,
        place_id: PlaceId,
    ) -> Result<()>;

    /// `GET /api/lists/:id/users`
    async fn get_list_users(&self, list_id: ListId) -> Result<Vec<ListUser>>;

    /// `POST /api/lists/:id/users`
    async fn add_list_user(
        &self,
        credential: &Credential,
        list_id: ListId,
        username: &str,
    ) -> Result<()>;

    /// `DELETE /api/lists/:id/users/:userId`
    async fn remove_list_user(
        &self,
        credential: &Credential,
        list_id: ListId,
        user_id: UserId,
    ) -> Result<()>;

    /// `POST /api/place-data`
    async fn save_place_data(&self, candidate: &PlaceCandidate) -> Result<CaptureAck>;
}
