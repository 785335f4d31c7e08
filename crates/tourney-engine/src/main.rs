//! Bootstrap binary for the tournament entry store.
//!
//! Wires configuration, logging and the file-backed store together, then
//! reports what it found.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tourney-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Open the store, seeding and writing the default state on first run
//! 4. Audit the snapshot and log a summary

mod error;

use std::path::Path;

use tourney_core::config::LoggingConfig;
use tourney_core::{IntegrityReport, Store, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Configuration file read from the working directory.
const CONFIG_PATH: &str = "tourney-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging setup or opening the store
/// fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("tourney-engine starting");
    info!(
        from_file,
        data_dir = %config.storage.data_dir.display(),
        key = config.storage.key,
        persist_session = config.storage.persist_session,
        scheme = ?config.credentials.scheme,
        locale = ?config.locale,
        "Configuration loaded"
    );

    // 3. Open the store.
    let store = Store::from_config(&config)?;
    let snapshot = store.snapshot();
    info!(
        users = snapshot.users.len(),
        tournaments = snapshot.tournaments.len(),
        pending_payments = snapshot.pending_payments().count(),
        messages = snapshot.messages.len(),
        session = snapshot.current_user_id.is_some(),
        "Store ready"
    );

    // 4. Audit.
    match store.audit() {
        IntegrityReport::Consistent => info!("Snapshot integrity verified"),
        IntegrityReport::Violations(violations) => {
            warn!(count = violations.len(), "Snapshot has integrity violations");
        }
    }

    info!("tourney-engine finished");
    Ok(())
}

/// Load `tourney-config.yaml` if it exists, otherwise defaults with
/// environment overrides applied. The flag reports whether a file was read.
fn load_config() -> Result<(StoreConfig, bool), EngineError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok((StoreConfig::from_file(path)?, true))
    } else {
        let mut config = StoreConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}
