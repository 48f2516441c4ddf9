//! Place domain module.
//!
//! - `model`: place record as returned by the backend
//! - `edit`: the transient edit buffer of the place view
//! - `pagination`: client-side paging of the catalog

mod edit;
mod model;
mod pagination;

pub use edit::{PlaceEditForm, PlaceUpdate, split_list_field};
pub use model::{Place, PlaceId};
pub use pagination::Paginator;
