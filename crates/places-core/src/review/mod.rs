//! Review domain module.

mod model;

pub use model::{DEFAULT_REVIEW_SCORE, NewReview, Review, ReviewForm, ReviewId};
