//! In-memory fakes shared by the application tests.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use places_core::api::{CaptureAck, PlacesApi};
use places_core::error::{PlacesError, Result};
use places_core::list::{ListId, ListUser, NewList, PlaceList};
use places_core::map::{Coordinates, MapContainer, MapHandle, MapMarker, MapProvider, PlaceCandidate};
use places_core::place::{Place, PlaceId, PlaceUpdate};
use places_core::review::{NewReview, Review};
use places_core::session::{Credential, Credentials, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Builds a token the way the backend does, unsigned.
pub fn token_expiring_at(user_id: UserId, expires_at: DateTime<Utc>) -> String {
    let claims = format!(
        r#"{{"user_id":{},"exp":{}}}"#,
        user_id,
        expires_at.timestamp()
    );
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims)
    )
}

/// A token valid for an hour from the wall clock.
pub fn fresh_token(user_id: UserId) -> String {
    token_expiring_at(user_id, Utc::now() + chrono::Duration::hours(1))
}

pub fn place(id: PlaceId, name: &str) -> Place {
    Place {
        id,
        name: name.to_string(),
        address: format!("{} street", name),
        latitude: 55.75 + id as f64 / 1000.0,
        longitude: 37.61 + id as f64 / 1000.0,
        ..Place::default()
    }
}

#[derive(Default)]
struct BackendState {
    login_token: Option<String>,
    places: Vec<Place>,
    reviews: Vec<Review>,
    lists: Vec<PlaceList>,
    list_places: HashMap<ListId, Vec<PlaceId>>,
    list_users: HashMap<ListId, Vec<ListUser>>,
    users: Vec<ListUser>,
    failures: HashMap<&'static str, PlacesError>,
    capture_response: Option<Result<CaptureAck>>,
    calls: Vec<String>,
    tokens_seen: Vec<String>,
    last_update: Option<PlaceUpdate>,
    next_id: i64,
}

/// Backend double holding the server state in memory.
///
/// Failures are injected per operation name (the `PlacesApi` method name).
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
    place_gate: Mutex<Option<Arc<Notify>>>,
    write_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().next_id = 1000;
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().unwrap()
    }

    /// Records the call and returns the injected failure, if any.
    fn enter(&self, op: &'static str, detail: String) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(format!("{} {}", op, detail).trim_end().to_string());
        match state.failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn authorize(&self, credential: &Credential) {
        self.lock().tokens_seen.push(credential.token().to_string());
    }

    pub fn set_login_token(&self, token: &str) {
        self.lock().login_token = Some(token.to_string());
    }

    pub fn fail_login(&self, err: PlacesError) {
        self.fail("login", err);
    }

    pub fn fail(&self, op: &'static str, err: PlacesError) {
        self.lock().failures.insert(op, err);
    }

    pub fn add_place(&self, place: Place) {
        self.lock().places.push(place);
    }

    pub fn add_user(&self, id: UserId, username: &str) {
        self.lock().users.push(ListUser {
            id,
            username: username.to_string(),
        });
    }

    pub fn add_list(&self, id: ListId, name: &str, owner: UserId) {
        self.lock().lists.push(PlaceList {
            id,
            name: name.to_string(),
            owner_id: Some(owner),
            created_at: String::new(),
        });
    }

    pub fn link_place(&self, list_id: ListId, place_id: PlaceId) {
        self.lock()
            .list_places
            .entry(list_id)
            .or_default()
            .push(place_id);
    }

    pub fn set_capture_response(&self, response: Result<CaptureAck>) {
        self.lock().capture_response = Some(response);
    }

    /// Makes `get_place` wait forever until the returned gate is notified.
    pub fn hold_place_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.place_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Makes reviews, place edits and list additions wait for the returned
    /// gate before they reach the server state.
    pub fn hold_writes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.write_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn pass_write_gate(&self) {
        let gate = self.write_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .count()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.lock().tokens_seen.clone()
    }

    pub fn last_update(&self) -> Option<PlaceUpdate> {
        self.lock().last_update.clone()
    }

    pub fn server_place(&self, id: PlaceId) -> Option<Place> {
        self.lock().places.iter().find(|p| p.id == id).cloned()
    }

    pub fn server_list_place_ids(&self, list_id: ListId) -> Vec<PlaceId> {
        self.lock()
            .list_places
            .get(&list_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn server_list_user_ids(&self, list_id: ListId) -> Vec<UserId> {
        self.lock()
            .list_users
            .get(&list_id)
            .map(|users| users.iter().map(|u| u.id).collect())
            .unwrap_or_default()
    }

    pub fn server_list_names(&self) -> Vec<String> {
        self.lock().lists.iter().map(|l| l.name.clone()).collect()
    }
}

#[async_trait]
impl PlacesApi for FakeBackend {
    async fn register(&self, credentials: &Credentials) -> Result<String> {
        self.enter("register", credentials.username.clone())?;
        Ok("User registered successfully".to_string())
    }

    async fn login(&self, credentials: &Credentials) -> Result<String> {
        self.enter("login", credentials.username.clone())?;
        self.lock()
            .login_token
            .clone()
            .ok_or_else(|| PlacesError::server(401, Some("Invalid username or password".into())))
    }

    async fn search_places(&self, name: Option<&str>) -> Result<Vec<Place>> {
        self.enter("search_places", name.unwrap_or_default().to_string())?;
        let needle = name.map(str::to_lowercase);
        Ok(self
            .lock()
            .places
            .iter()
            .filter(|p| match &needle {
                Some(needle) => p.name.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_place(&self, id: PlaceId) -> Result<Place> {
        let gate = self.place_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.enter("get_place", id.to_string())?;
        self.server_place(id)
            .ok_or_else(|| PlacesError::server(404, Some("Place not found".into())))
    }

    async fn update_place(
        &self,
        credential: &Credential,
        id: PlaceId,
        update: &PlaceUpdate,
    ) -> Result<()> {
        self.pass_write_gate().await;
        self.enter("update_place", id.to_string())?;
        self.authorize(credential);
        let mut state = self.lock();
        state.last_update = Some(update.clone());
        let place = state
            .places
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PlacesError::server(404, Some("Place not found".into())))?;
        place.name = update.name.clone();
        place.address = update.address.clone();
        place.category = update.category.clone();
        place.description = update.description.clone();
        place.work_hours = update.work_hours.clone();
        place.website = update.website.clone();
        place.phone = update.phone.clone();
        Ok(())
    }

    async fn get_reviews(&self, place_id: PlaceId) -> Result<Vec<Review>> {
        self.enter("get_reviews", place_id.to_string())?;
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.id_place == place_id)
            .cloned()
            .collect())
    }

    async fn add_review(&self, credential: &Credential, review: &NewReview) -> Result<()> {
        self.pass_write_gate().await;
        self.enter("add_review", review.id_place.to_string())?;
        self.authorize(credential);
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.reviews.push(Review {
            id,
            id_place: review.id_place,
            id_user: review.id_user,
            review_text: review.review_text.clone(),
            review_score: review.review_score,
            created_at: String::new(),
            username: String::new(),
        });
        let scores: Vec<f64> = state
            .reviews
            .iter()
            .filter(|r| r.id_place == review.id_place)
            .map(|r| f64::from(r.review_score))
            .collect();
        if let Some(place) = state.places.iter_mut().find(|p| p.id == review.id_place) {
            place.total_reviews = scores.len() as u32;
            place.average_rating = scores.iter().sum::<f64>() / scores.len() as f64;
        }
        Ok(())
    }

    async fn get_lists(&self, credential: &Credential) -> Result<Vec<PlaceList>> {
        self.enter("get_lists", String::new())?;
        self.authorize(credential);
        let owner = credential.subject_id();
        Ok(self
            .lock()
            .lists
            .iter()
            .filter(|l| l.owner_id == Some(owner))
            .cloned()
            .collect())
    }

    async fn create_list(&self, credential: &Credential, list: &NewList) -> Result<()> {
        self.enter("create_list", list.list_name.clone())?;
        self.authorize(credential);
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.lists.push(PlaceList {
            id,
            name: list.list_name.clone(),
            owner_id: Some(credential.subject_id()),
            created_at: String::new(),
        });
        Ok(())
    }

    async fn get_list(&self, id: ListId) -> Result<PlaceList> {
        self.enter("get_list", id.to_string())?;
        self.lock()
            .lists
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| PlacesError::server(404, Some("List not found".into())))
    }

    async fn get_list_places(&self, list_id: ListId) -> Result<Vec<Place>> {
        self.enter("get_list_places", list_id.to_string())?;
        let state = self.lock();
        let ids = state.list_places.get(&list_id).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| state.places.iter().find(|p| p.id == *id).cloned())
            .collect())
    }

    async fn add_list_place(
        &self,
        credential: &Credential,
        list_id: ListId,
        place_id: PlaceId,
    ) -> Result<()> {
        self.pass_write_gate().await;
        self.enter("add_list_place", format!("{} {}", list_id, place_id))?;
        self.authorize(credential);
        self.link_place(list_id, place_id);
        Ok(())
    }

    async fn remove_list_place(
        &self,
        credential: &Credential,
        list_id: ListId,
        place_id: PlaceId,
    ) -> Result<()> {
        self.enter("remove_list_place", format!("{} {}", list_id, place_id))?;
        self.authorize(credential);
        if let Some(ids) = self.lock().list_places.get_mut(&list_id) {
            ids.retain(|id| *id != place_id);
        }
        Ok(())
    }

    async fn get_list_users(&self, list_id: ListId) -> Result<Vec<ListUser>> {
        self.enter("get_list_users", list_id.to_string())?;
        Ok(self
            .lock()
            .list_users
            .get(&list_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_list_user(
        &self,
        credential: &Credential,
        list_id: ListId,
        username: &str,
    ) -> Result<()> {
        self.enter("add_list_user", format!("{} {}", list_id, username))?;
        self.authorize(credential);
        let mut state = self.lock();
        let user = state
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| PlacesError::server(404, Some("User not found".into())))?;
        state.list_users.entry(list_id).or_default().push(user);
        Ok(())
    }

    async fn remove_list_user(
        &self,
        credential: &Credential,
        list_id: ListId,
        user_id: UserId,
    ) -> Result<()> {
        self.enter("remove_list_user", format!("{} {}", list_id, user_id))?;
        self.authorize(credential);
        if let Some(users) = self.lock().list_users.get_mut(&list_id) {
            users.retain(|u| u.id != user_id);
        }
        Ok(())
    }

    async fn save_place_data(&self, candidate: &PlaceCandidate) -> Result<CaptureAck> {
        self.enter("save_place_data", candidate.place_id.clone())?;
        self.lock().capture_response.clone().unwrap_or_else(|| {
            Ok(CaptureAck {
                status: "success".to_string(),
                message: "Place saved successfully".to_string(),
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Init {
        handle: MapHandle,
        container: String,
        center: Coordinates,
        zoom: u8,
    },
    AddMarkers {
        handle: MapHandle,
        markers: Vec<MapMarker>,
    },
    Destroy(MapHandle),
}

/// Map provider that records every call.
#[derive(Default)]
pub struct RecordingMapProvider {
    events: Mutex<Vec<MapEvent>>,
    live: Mutex<Vec<MapHandle>>,
    next: Mutex<u64>,
}

impl RecordingMapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MapEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn live_instances(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn destroy_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, MapEvent::Destroy(_)))
            .count()
    }

    pub fn init_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, MapEvent::Init { .. }))
            .count()
    }
}

impl MapProvider for RecordingMapProvider {
    fn init(&self, container: &MapContainer, center: Coordinates, zoom: u8) -> Result<MapHandle> {
        let handle = {
            let mut next = self.next.lock().unwrap();
            *next += 1;
            MapHandle(*next)
        };
        self.live.lock().unwrap().push(handle);
        self.events.lock().unwrap().push(MapEvent::Init {
            handle,
            container: container.id().to_string(),
            center,
            zoom,
        });
        Ok(handle)
    }

    fn add_markers(&self, handle: MapHandle, markers: &[MapMarker]) -> Result<()> {
        if !self.live.lock().unwrap().contains(&handle) {
            return Err(PlacesError::map("unknown handle"));
        }
        self.events.lock().unwrap().push(MapEvent::AddMarkers {
            handle,
            markers: markers.to_vec(),
        });
        Ok(())
    }

    fn destroy(&self, handle: MapHandle) {
        let mut live = self.live.lock().unwrap();
        if let Some(pos) = live.iter().position(|h| *h == handle) {
            live.remove(pos);
            self.events.lock().unwrap().push(MapEvent::Destroy(handle));
        }
    }
}
