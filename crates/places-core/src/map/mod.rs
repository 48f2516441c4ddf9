//! Map widget port and search-result extraction.
//!
//! The concrete widget is host-controlled. The client only sees it through
//! [`MapProvider`], so providers are swappable and testable with fakes.

mod provider;
mod search;

pub use provider::{Coordinates, MapContainer, MapHandle, MapMarker, MapProvider};
pub use search::{PlaceCandidate, extract_candidate};
