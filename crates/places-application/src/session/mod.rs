//! Authentication state and account creation.

pub mod manager;
pub mod registration;

pub use manager::{LOGIN_FAILED, SessionManager};
pub use registration::{POLICY_NOT_ACCEPTED, REGISTRATION_FAILED, RegistrationService};
