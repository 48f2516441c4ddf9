pub mod config_service;
pub mod console_map;
pub mod http_api;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::console_map::ConsoleMapProvider;
pub use crate::http_api::HttpPlacesApi;
pub use crate::paths::PlacesPaths;
pub use crate::storage::{FileTokenStore, MemoryTokenStore};
