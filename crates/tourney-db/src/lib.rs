//! Persistence layer for the tournament entry store.
//!
//! The store's durable state is a single serialized [`Snapshot`] under one
//! fixed key. After every change the full snapshot is written back; at
//! startup it is read once.
//!
//! ```text
//! Mutation committed
//!     |
//!     +-- SnapshotStore::save(&Snapshot)
//!         |-- FileSnapshotStore    (<dir>/<key>.json, temp file + rename)
//!         +-- MemorySnapshotStore  (serialized JSON held in memory)
//! ```
//!
//! # Modules
//!
//! - [`snapshot_store`] -- The [`SnapshotStore`] trait and its backends
//! - [`error`] -- Shared error types
//!
//! [`Snapshot`]: tourney_types::Snapshot

pub mod error;
pub mod snapshot_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use snapshot_store::{FileSnapshotStore, MemorySnapshotStore, STORAGE_KEY, SnapshotStore};
