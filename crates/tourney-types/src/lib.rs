//! Shared type definitions for the tournament entry store.
//!
//! This crate is the single source of truth for every entity the store
//! holds. Types defined here flow downstream to `TypeScript` via `ts-rs` for
//! the presentation layer, and their serde shape is the persisted snapshot
//! format.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for all entity identifiers
//! - [`enums`] -- Roles, match types, payment kinds and states
//! - [`structs`] -- Entities, the [`Snapshot`] aggregate, and [`OpResult`]

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{MatchType, PaymentMethod, PaymentStatus, PaymentType, Role};
pub use ids::{MessageId, PaymentId, TournamentId, UserId};
pub use structs::{
    AppSettings, ChatMessage, Entry, NewUser, OpResult, PaymentRequest, Snapshot, Tournament,
    User, UserPatch,
};
