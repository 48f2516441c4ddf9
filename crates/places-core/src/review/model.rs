use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{PlacesError, Result};
use crate::place::PlaceId;
use crate::serde_util::null_as_default;
use crate::session::UserId;

pub type ReviewId = i64;

pub const DEFAULT_REVIEW_SCORE: u8 = 5;
const SCORE_RANGE: RangeInclusive<u8> = 1..=10;

/// A review as listed under a place. Append-only from the client's side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub id_place: PlaceId,
    pub id_user: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_text: String,
    pub review_score: u8,
    /// Server-formatted date (`dd/mm/yyyy`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

/// Body of `POST /api/review`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReview {
    pub id_place: PlaceId,
    pub id_user: UserId,
    pub review_text: String,
    pub review_score: u8,
}

/// The review form of the place view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub text: String,
    pub score: u8,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            score: DEFAULT_REVIEW_SCORE,
        }
    }
}

impl ReviewForm {
    pub fn new(text: impl Into<String>, score: u8) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }

    /// Checks the form and builds the payload for `place_id` by `user_id`.
    pub fn to_new_review(&self, place_id: PlaceId, user_id: UserId) -> Result<NewReview> {
        if !SCORE_RANGE.contains(&self.score) {
            return Err(PlacesError::validation(format!(
                "Score must be between {} and {}",
                SCORE_RANGE.start(),
                SCORE_RANGE.end()
            )));
        }
        let text = self.text.trim();
        if text.is_empty() {
            return Err(PlacesError::validation("Review text must not be empty"));
        }
        Ok(NewReview {
            id_place: place_id,
            id_user: user_id,
            review_text: text.to_string(),
            review_score: self.score,
        })
    }
}
