//! HTTP gateway to the places backend.
//!
//! Stateless: every call builds its request from the base URL, the payload
//! and, for authenticated endpoints, the credential handed in by the caller.

use async_trait::async_trait;
use places_core::api::{CaptureAck, PlacesApi};
use places_core::config::{AuthScheme, ClientConfig};
use places_core::error::{PlacesError, Result};
use places_core::list::{ListId, ListUser, NewList, PlaceList};
use places_core::map::PlaceCandidate;
use places_core::place::{Place, PlaceId, PlaceUpdate};
use places_core::review::{NewReview, Review};
use places_core::session::{Credential, Credentials, UserId};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpPlacesApi {
    client: Client,
    base_url: String,
    auth_scheme: AuthScheme,
}

impl HttpPlacesApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PlacesError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            auth_scheme: config.auth_scheme,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.header(AUTHORIZATION, credential.authorization(self.auth_scheme))
    }

    /// Sends `request` and decodes a successful JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check(request.send().await.map_err(transport_error)?).await?;
        response.json::<T>().await.map_err(transport_error)
    }

    /// Sends a mutation; the acknowledgement body is not interpreted.
    async fn execute(&self, request: RequestBuilder) -> Result<()> {
        check(request.send().await.map_err(transport_error)?).await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> PlacesError {
    if err.is_decode() {
        PlacesError::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    } else {
        PlacesError::network(err.to_string())
    }
}

/// Maps a non-success response to [`PlacesError::Server`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::debug!(
        "[HttpPlacesApi] {} {}",
        status,
        message.as_deref().unwrap_or("<no message>")
    );
    Err(PlacesError::server(status.as_u16(), message))
}

/// Pulls `message` out of a `{ "message": ..., "status": "error" }` body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[derive(Deserialize)]
struct TokenEnvelope {
    token: Option<String>,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct PlacesEnvelope {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Deserialize)]
struct PlaceEnvelope {
    place: Place,
}

#[derive(Deserialize)]
struct ReviewsEnvelope {
    #[serde(default)]
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct ListsEnvelope {
    #[serde(default)]
    lists: Vec<PlaceList>,
}

#[derive(Deserialize)]
struct ListEnvelope {
    list: PlaceList,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users: Vec<ListUser>,
}

#[async_trait]
impl PlacesApi for HttpPlacesApi {
    async fn register(&self, credentials: &Credentials) -> Result<String> {
        let request = self.client.post(self.url("/api/register")).json(credentials);
        let envelope: MessageEnvelope = self.fetch(request).await?;
        Ok(envelope.message)
    }

    async fn login(&self, credentials: &Credentials) -> Result<String> {
        tracing::info!("[HttpPlacesApi] Logging in as {}", credentials.username);
        let request = self.client.post(self.url("/api/login")).json(credentials);
        let envelope: TokenEnvelope = self.fetch(request).await?;
        envelope.token.ok_or_else(|| PlacesError::Serialization {
            format: "JSON".to_string(),
            message: "login response carried no token".to_string(),
        })
    }

    async fn search_places(&self, name: Option<&str>) -> Result<Vec<Place>> {
        let mut request = self.client.get(self.url("/api/places"));
        if let Some(name) = name {
            request = request.query(&[("name", name)]);
        }
        let envelope: PlacesEnvelope = self.fetch(request).await?;
        Ok(envelope.places)
    }

    async fn get_place(&self, id: PlaceId) -> Result<Place> {
        let request = self.client.get(self.url(&format!("/api/place/{}", id)));
        let envelope: PlaceEnvelope = self.fetch(request).await?;
        Ok(envelope.place)
    }

    async fn update_place(
        &self,
        credential: &Credential,
        id: PlaceId,
        update: &PlaceUpdate,
    ) -> Result<()> {
        let request = self
            .client
            .put(self.url(&format!("/api/place/{}", id)))
            .json(update);
        self.execute(self.authorized(request, credential)).await
    }

    async fn get_reviews(&self, place_id: PlaceId) -> Result<Vec<Review>> {
        let request = self
            .client
            .get(self.url(&format!("/api/reviews/{}", place_id)));
        let envelope: ReviewsEnvelope = self.fetch(request).await?;
        Ok(envelope.reviews)
    }

    async fn add_review(&self, credential: &Credential, review: &NewReview) -> Result<()> {
        let request = self.client.post(self.url("/api/review")).json(review);
        self.execute(self.authorized(request, credential)).await
    }

    async fn get_lists(&self, credential: &Credential) -> Result<Vec<PlaceList>> {
        let request = self.authorized(self.client.get(self.url("/api/lists")), credential);
        let envelope: ListsEnvelope = self.fetch(request).await?;
        Ok(envelope.lists)
    }

    async fn create_list(&self, credential: &Credential, list: &NewList) -> Result<()> {
        let request = self.client.post(self.url("/api/lists")).json(list);
        self.execute(self.authorized(request, credential)).await
    }

    async fn get_list(&self, id: ListId) -> Result<PlaceList> {
        let request = self.client.get(self.url(&format!("/api/lists/{}", id)));
        let envelope: ListEnvelope = self.fetch(request).await?;
        Ok(envelope.list)
    }

    async fn get_list_places(&self, list_id: ListId) -> Result<Vec<Place>> {
        let request = self
            .client
            .get(self.url(&format!("/api/lists/{}/places", list_id)));
        let envelope: PlacesEnvelope = self.fetch(request).await?;
        Ok(envelope.places)
    }

    async fn add_list_place(
        &self,
        credential: &Credential,
        list_id: ListId,
        place_id: PlaceId,
    ) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("/api/lists/{}/places", list_id)))
            .json(&serde_json::json!({ "place_id": place_id }));
        self.execute(self.authorized(request, credential)).await
    }

    async fn remove_list_place(
        &self,
        credential: &Credential,
        list_id: ListId,
        place_id: PlaceId,
    ) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/lists/{}/places/{}", list_id, place_id)));
        self.execute(self.authorized(request, credential)).await
    }

    async fn get_list_users(&self, list_id: ListId) -> Result<Vec<ListUser>> {
        let request = self
            .client
            .get(self.url(&format!("/api/lists/{}/users", list_id)));
        let envelope: UsersEnvelope = self.fetch(request).await?;
        Ok(envelope.users)
    }

    async fn add_list_user(
        &self,
        credential: &Credential,
        list_id: ListId,
        username: &str,
    ) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("/api/lists/{}/users", list_id)))
            .json(&serde_json::json!({ "username": username }));
        self.execute(self.authorized(request, credential)).await
    }

    async fn remove_list_user(
        &self,
        credential: &Credential,
        list_id: ListId,
        user_id: UserId,
    ) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/lists/{}/users/{}", list_id, user_id)));
        self.execute(self.authorized(request, credential)).await
    }

    async fn save_place_data(&self, candidate: &PlaceCandidate) -> Result<CaptureAck> {
        let request = self.client.post(self.url("/api/place-data")).json(candidate);
        self.fetch(request).await
    }
}
