//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: credentials, decoded session and the usable credential
//! - `token`: decoding of the JWT the backend issues on login
//! - `store`: persistence port for the token
//! - `route`: views and which of them need a session

mod model;
mod route;
mod store;
mod token;

pub use model::{Credential, Credentials, Session, UserId};
pub use route::Route;
pub use store::{TOKEN_KEY, TokenStore};
pub use token::{TokenClaims, decode_token};
