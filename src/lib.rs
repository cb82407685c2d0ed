// src/lib.rs
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use tracing::{info, warn};

// --- Declare modules ---
pub mod config;
pub mod db;
pub mod event;
pub mod logging;
pub mod lookup;
pub mod navigator;
pub mod parser;
pub mod screens;
pub mod store_worker;
mod ui;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, LookupConfig, StandardColor, Theme,
};
pub use db::{get_db_path as get_db_path_util, Error as DbError, PersonalBest, Store, WorkoutEntry};
pub use event::{AppEvent, LookupOutcome};
pub use lookup::{LookupError, Lookups, ReferenceSource, WikipediaClient};
pub use navigator::Navigator;
pub use parser::{extract_set, format_set, parse_set, SetInput};
pub use screens::{Screen, ScreenContext, ScreenKind, Transition};
pub use store_worker::{StoreHandle, StoreWorker};

/// Everything loaded before the UI starts: config, paths and an initialized store.
pub struct AppService {
    pub config: Config,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    pub store: Store,
}

impl AppService {
    /// Loads the config, starts logging, opens the database and runs migrations.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or schema setup fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        // Logging is best effort, the tool works without it
        if let Err(e) = logging::init_logging(&config) {
            eprintln!("Warning: logging disabled: {e:#}");
        }

        let db_path = match &config.db_path {
            Some(path) => path.clone(),
            None => db::get_db_path().context("Failed to determine database path")?,
        };
        let mut store = Store::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;
        let applied = store
            .init_schema(Some(&config.migrations_dir))
            .context("Failed to initialize database schema")?;
        info!(applied, version = store.schema_version()?, "database schema ready");

        Ok(Self {
            config,
            config_path,
            db_path,
            store,
        })
    }

    /// Hands the store to its worker thread and builds the navigator.
    pub fn start(self) -> Session {
        let source: Arc<dyn ReferenceSource> = match WikipediaClient::new(&self.config.lookup) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("reference lookups unavailable: {e}");
                Arc::new(lookup::Unavailable(e.to_string()))
            }
        };
        Session::start(self.store, source, self.config.theme)
    }
}

/// A running UI session: navigator, the event queue fed by background work,
/// and the store worker.
pub struct Session {
    pub navigator: Navigator,
    events: Receiver<AppEvent>,
    worker: StoreWorker,
}

impl Session {
    pub fn start(store: Store, source: Arc<dyn ReferenceSource>, theme: Theme) -> Self {
        let (events_tx, events) = mpsc::channel();
        let (store, worker) = store_worker::spawn(store, events_tx.clone());
        let lookups = Lookups::new(source, events_tx);
        let navigator = Navigator::new(ScreenContext {
            store,
            lookups,
            theme,
        });
        Self {
            navigator,
            events,
            worker,
        }
    }

    /// Feeds every background event that has arrived into the navigator.
    pub fn drain_background_events(&mut self) -> Result<()> {
        while let Ok(event) = self.events.try_recv() {
            self.navigator.handle_event(event)?;
        }
        Ok(())
    }

    /// Waits for one background event, for callers without a terminal to poll.
    pub fn wait_background_event(&mut self, timeout: std::time::Duration) -> Result<bool> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => {
                self.navigator.handle_event(event)?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    /// Drops every store handle and waits until queued writes are on disk.
    pub fn shutdown(self) {
        let Self {
            navigator,
            events,
            worker,
        } = self;
        drop(navigator);
        drop(events);
        worker.join();
    }

    /// Shuts down, then runs `teardown`. Queued writes reach the database
    /// whether or not `teardown` succeeds.
    pub fn close_then<F>(self, teardown: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.shutdown();
        teardown()
    }
}
