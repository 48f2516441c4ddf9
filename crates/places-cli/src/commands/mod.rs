pub mod auth;
pub mod lists;
pub mod places;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use places_application::PlacesApp;
use places_application::notify::drain;
use places_core::notice::{Notice, NoticeLevel};
use places_core::session::Route;
use places_infrastructure::{ConfigService, ConsoleMapProvider, FileTokenStore, PlacesPaths};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// One CLI invocation: the app, its notice queue and a headless map.
pub struct Shell {
    pub app: PlacesApp,
    pub map: Arc<ConsoleMapProvider>,
    notices: UnboundedReceiver<Notice>,
}

impl Shell {
    pub async fn open(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let paths = PlacesPaths::new(data_dir.as_deref());
        let config_service = match config {
            Some(path) => ConfigService::with_path(path),
            None if data_dir.is_some() => ConfigService::with_path(paths.config_file()?),
            None => ConfigService::new(),
        };
        let config = config_service.get_config();
        tracing::debug!(
            "[Shell] Backend {} (auth scheme {})",
            config.base_url(),
            config.auth_scheme
        );

        let store = Arc::new(FileTokenStore::with_path(
            paths
                .session_file()
                .context("Failed to resolve the session file")?,
        ));
        let (app, notices) = PlacesApp::from_config(config, store)?;
        app.session().restore_session().await;

        Ok(Self {
            app,
            map: Arc::new(ConsoleMapProvider::new()),
            notices,
        })
    }

    /// Refuses views that need a session when none is active.
    pub async fn enter(&self, route: Route) -> Result<()> {
        let resolved = self.app.session().resolve_route(route).await;
        if resolved != route {
            bail!("{} requires a session. Run `places login` first.", route);
        }
        Ok(())
    }

    /// Prints every queued notice.
    pub fn flush_notices(&mut self) {
        for notice in drain(&mut self.notices) {
            match notice.level {
                NoticeLevel::Success => println!("{}", notice.message.green()),
                NoticeLevel::Info => println!("{}", notice.message.cyan()),
                NoticeLevel::Error => eprintln!("{}", notice.message.red()),
            }
        }
    }
}
