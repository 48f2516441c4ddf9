//! Application layer of the places client.
//!
//! Coordinates the domain ports with view state: the session manager, one
//! sync controller per view and the map adapters. Shells (the CLI, a UI)
//! build a [`PlacesApp`] and drive the controllers it hands out.

pub mod app;
pub mod map;
pub mod notify;
pub mod session;
pub mod sync;

#[cfg(test)]
mod testing;

pub use app::PlacesApp;
pub use notify::Notifier;
pub use session::{RegistrationService, SessionManager};
