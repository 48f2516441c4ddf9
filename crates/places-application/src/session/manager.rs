use crate::notify::Notifier;
use places_core::api::PlacesApi;
use places_core::clock::{Clock, SystemClock};
use places_core::error::{PlacesError, Result, SESSION_EXPIRED_MESSAGE};
use places_core::session::{Credential, Credentials, Route, Session, TokenStore, decode_token};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

pub const LOGIN_FAILED: &str = "Login failed";

/// Owns the authentication state of the client.
///
/// `SessionManager` is responsible for:
/// - Restoring a persisted token on startup
/// - Logging in and out
/// - Handing out credentials that were validated at the moment of use
/// - Publishing the authenticated flag to the shell
///
/// The persisted token is the source of truth. The in-memory session is a
/// cache that [`SessionManager::credential`] refreshes on every call.
pub struct SessionManager {
    api: Arc<dyn PlacesApi>,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
    /// Last decoded session, `None` when logged out
    session: RwLock<Option<Session>>,
    authenticated: watch::Sender<bool>,
}

impl SessionManager {
    /// Creates a logged-out manager using the system clock.
    ///
    /// Call [`SessionManager::restore_session`] to pick up a persisted token.
    pub fn new(api: Arc<dyn PlacesApi>, store: Arc<dyn TokenStore>, notifier: Notifier) -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            api,
            store,
            clock: Arc::new(SystemClock),
            notifier,
            session: RwLock::new(None),
            authenticated,
        }
    }

    /// Replaces the time source used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reads the persisted token and adopts it if it is still valid.
    ///
    /// Undecodable or expired tokens are removed from the store. Storage
    /// failures are logged and treated as "no session".
    pub async fn restore_session(&self) -> Option<Session> {
        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("[SessionManager] No persisted token");
                self.set_session(None).await;
                return None;
            }
            Err(e) => {
                tracing::warn!("[SessionManager] Failed to read persisted token: {}", e);
                self.set_session(None).await;
                return None;
            }
        };

        match self.validate(&token) {
            Ok(session) => {
                tracing::info!(
                    "[SessionManager] Restored session for user {}",
                    session.subject_id
                );
                self.set_session(Some(session.clone())).await;
                Some(session)
            }
            Err(e) => {
                tracing::info!("[SessionManager] Discarding persisted token: {}", e);
                self.clear_store().await;
                self.set_session(None).await;
                None
            }
        }
    }

    /// Exchanges credentials for a token and persists it.
    ///
    /// On failure the current state is left as it was. Use
    /// `err.user_message(LOGIN_FAILED)` for the text to show.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let token = self.api.login(credentials).await.inspect_err(|e| {
            tracing::warn!("[SessionManager] Login failed: {}", e);
        })?;

        let session = self.validate(&token).map_err(|e| {
            tracing::error!("[SessionManager] Server issued an unusable token: {}", e);
            PlacesError::internal(format!("unusable token: {}", e))
        })?;

        self.store.save(&session.token).await?;
        self.set_session(Some(session.clone())).await;
        tracing::info!("[SessionManager] Logged in as user {}", session.subject_id);
        Ok(session)
    }

    /// Forgets the session. Never fails; storage errors are logged.
    pub async fn logout(&self) {
        self.clear_store().await;
        self.set_session(None).await;
        tracing::info!("[SessionManager] Logged out");
    }

    /// Returns a credential for an authenticated call.
    ///
    /// The persisted token is re-read and decoded on every call. When it is
    /// missing, undecodable or expired the store is cleared, the session is
    /// dropped, a "session expired" notice is published and
    /// [`PlacesError::SessionExpired`] is returned.
    pub async fn credential(&self) -> Result<Credential> {
        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => return Err(self.expire("no persisted token").await),
            Err(e) => {
                tracing::warn!("[SessionManager] Failed to read persisted token: {}", e);
                return Err(self.expire("token store unreadable").await);
            }
        };

        match self.validate(&token) {
            Ok(session) => {
                let credential = session.credential();
                let mut guard = self.session.write().await;
                if guard.as_ref() != Some(&session) {
                    *guard = Some(session);
                    drop(guard);
                    self.authenticated.send_replace(true);
                }
                Ok(credential)
            }
            Err(e) => Err(self.expire(&e.to_string()).await),
        }
    }

    /// True while a non-expired session is held in memory.
    ///
    /// A held session found expired is dropped the same way
    /// [`SessionManager::credential`] drops it: the store is cleared, the
    /// flag goes to false and the "session expired" notice is published.
    pub async fn is_authenticated(&self) -> bool {
        let now = self.clock.now();
        let expired = match self.session.read().await.as_ref() {
            None => return false,
            Some(session) => session.is_expired_at(now),
        };
        if expired {
            self.expire("held session reached its expiry").await;
            return false;
        }
        true
    }

    pub async fn current(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Receiver of the authenticated flag, for the shell's routing.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// Redirects protected routes to the login view without a session.
    pub async fn resolve_route(&self, route: Route) -> Route {
        if route.requires_auth() && !self.is_authenticated().await {
            tracing::debug!("[SessionManager] {} requires login", route);
            Route::Login
        } else {
            route
        }
    }

    /// Decodes `token` and rejects it when already expired.
    fn validate(&self, token: &str) -> Result<Session> {
        let session = decode_token(token)?;
        if session.is_expired_at(self.clock.now()) {
            return Err(PlacesError::SessionExpired);
        }
        Ok(session)
    }

    async fn expire(&self, reason: &str) -> PlacesError {
        tracing::info!("[SessionManager] Session expired: {}", reason);
        self.clear_store().await;
        self.set_session(None).await;
        self.notifier.error(SESSION_EXPIRED_MESSAGE);
        PlacesError::SessionExpired
    }

    async fn clear_store(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!("[SessionManager] Failed to clear persisted token: {}", e);
        }
    }

    async fn set_session(&self, session: Option<Session>) {
        let authenticated = session.is_some();
        *self.session.write().await = session;
        self.authenticated.send_replace(authenticated);
    }
}
