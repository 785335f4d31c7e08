//! Core of the tournament entry store.
//!
//! Holds the mutation engine, the shared [`Store`] handle that serializes
//! and persists mutations, credential verification, the integrity audit,
//! seed state and configuration.
//!
//! ```text
//! caller ── Store::join_tournament(..) ──┐
//!                                        v
//!                     watch::Sender::send_if_modified
//!                        |-- engine::join_tournament(&snapshot, ..)
//!                        |-- publish Arc<Snapshot>
//!                        +-- SnapshotStore::save(..)
//! ```
//!
//! # Modules
//!
//! - [`engine`] -- Pure snapshot-to-snapshot mutation functions
//! - [`store`] -- The shared, persisted store handle
//! - [`credentials`] -- Password sealing and verification
//! - [`integrity`] -- Cross-collection consistency audit
//! - [`seed`] -- Default snapshot for a fresh install
//! - [`locale`] -- Localized result messages
//! - [`config`] -- YAML configuration
//! - [`error`] -- Rejections and store errors

pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod integrity;
pub mod locale;
pub mod seed;
pub mod store;

// Re-export primary types for convenience.
pub use config::{ConfigError, StoreConfig};
pub use credentials::{
    Argon2Verifier, CredentialError, CredentialScheme, CredentialVerifier, PlaintextVerifier,
};
pub use error::{Rejection, StoreError};
pub use integrity::{IntegrityReport, Violation};
pub use locale::Locale;
pub use seed::SeedError;
pub use store::{Store, StoreOptions};
