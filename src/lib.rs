pub mod collaborators;
pub mod core;
pub mod lists;
pub mod persistence;
pub mod shared;

use crate::core::config::PersistenceConfig;
use crate::core::logging::{init_logging, LoggingGuards};
use crate::lists::{init_list_store, SharedListStore};
use crate::persistence::kv::FileStore;
use crate::persistence::Persistence;
use crate::shared::paths::{get_log_dir, get_storage_dir};
use std::sync::Arc;

/// A running store together with the logging it writes to.
pub struct App {
    pub store: SharedListStore,
    _logging: LoggingGuards,
}

/// Start logging, open the on-disk store and load the lists.
///
/// Call once at startup and inject `App::store` into the UI layer.
pub fn init() -> Result<App, Box<dyn std::error::Error>> {
    // Initialize logging first (before any other initialization)
    let logging = init_logging(&get_log_dir())?;

    let data_dir = get_storage_dir();
    let config = PersistenceConfig::from_env();
    tracing::info!(target: "system", ?config, "Opening storage at {:?}", data_dir);

    let persistence = Persistence::new(Arc::new(FileStore::new(data_dir)), config);
    let store = init_list_store(persistence);

    Ok(App {
        store,
        _logging: logging,
    })
}
