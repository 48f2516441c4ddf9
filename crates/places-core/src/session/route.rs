use std::fmt;

use crate::list::ListId;
use crate::place::PlaceId;

/// Top-level views of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Map,
    Login,
    Register,
    Place(PlaceId),
    List(ListId),
}

impl Route {
    /// Views that redirect to login without a session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Home | Route::Map)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Map => write!(f, "/map"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::Place(id) => write!(f, "/place/{}", id),
            Route::List(id) => write!(f, "/list/{}", id),
        }
    }
}
