use places_core::api::PlacesApi;
use places_core::error::{PlacesError, Result};
use places_core::session::Credentials;
use std::sync::Arc;

pub const POLICY_NOT_ACCEPTED: &str = "You must agree to the privacy policy to register.";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Creates accounts. Registration does not log the user in.
pub struct RegistrationService {
    api: Arc<dyn PlacesApi>,
}

impl RegistrationService {
    pub fn new(api: Arc<dyn PlacesApi>) -> Self {
        Self { api }
    }

    /// Registers `credentials` and returns the server's message.
    ///
    /// Refused locally unless the privacy policy was accepted. Use
    /// `err.user_message(REGISTRATION_FAILED)` for the text to show.
    pub async fn register(
        &self,
        credentials: &Credentials,
        agreed_to_policy: bool,
    ) -> Result<String> {
        if !agreed_to_policy {
            return Err(PlacesError::validation(POLICY_NOT_ACCEPTED));
        }
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(PlacesError::validation("Username and password are required"));
        }

        let message = self.api.register(credentials).await.inspect_err(|e| {
            tracing::warn!("[Registration] Failed for {}: {}", credentials.username, e);
        })?;
        tracing::info!("[Registration] Registered {}", credentials.username);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn test_policy_must_be_accepted() {
        let backend = Arc::new(FakeBackend::new());
        let service = RegistrationService::new(backend.clone());

        let err = service
            .register(&Credentials::new("a", "b"), false)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(REGISTRATION_FAILED), POLICY_NOT_ACCEPTED);
        assert_eq!(backend.call_count("register"), 0);
    }

    #[tokio::test]
    async fn test_register_returns_server_message() {
        let backend = Arc::new(FakeBackend::new());
        let service = RegistrationService::new(backend.clone());

        let message = service
            .register(&Credentials::new("a", "b"), true)
            .await
            .unwrap();

        assert_eq!(message, "User registered successfully");
        assert_eq!(backend.call_count("register"), 1);
    }

    #[tokio::test]
    async fn test_register_failure_uses_server_message() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail(
            "register",
            PlacesError::server(400, Some("Username already exists".into())),
        );
        let service = RegistrationService::new(backend);

        let err = service
            .register(&Credentials::new("a", "b"), true)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(REGISTRATION_FAILED), "Username already exists");

        let network = PlacesError::network("refused");
        assert_eq!(
            network.user_message(REGISTRATION_FAILED),
            places_core::error::NETWORK_ERROR_MESSAGE
        );
    }
}
