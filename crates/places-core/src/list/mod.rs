//! List domain module.
//!
//! A list is owned by one user, holds an ordered set of places and is shared
//! with collaborating users.

mod model;

pub use model::{ListId, ListUser, NewList, PlaceList};
