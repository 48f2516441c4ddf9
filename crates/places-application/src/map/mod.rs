//! Map-facing controllers.
//!
//! # Module Structure
//!
//! - `marker_adapter`: keeps one map instance in step with a place sequence
//! - `capture`: search selection and saving of selected places

pub mod capture;
pub mod marker_adapter;

pub use capture::{CaptureOutcome, PlaceCaptureService, SAVE_FAILED, SearchSelection};
pub use marker_adapter::{AdapterPhase, MarkerAdapter, MarkerLabel, rating_summary};
