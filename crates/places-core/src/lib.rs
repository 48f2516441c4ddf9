//! Domain layer of the Adventure Map places client.
//!
//! Holds the models exchanged with the backend, the ports the application
//! layer is written against ([`api::PlacesApi`], [`session::TokenStore`],
//! [`map::MapProvider`], [`clock::Clock`]) and the pure pieces of view logic
//! that need no I/O.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod list;
pub mod map;
pub mod notice;
pub mod place;
pub mod review;
pub mod session;

mod serde_util;

// Re-export common error type
pub use error::PlacesError;
