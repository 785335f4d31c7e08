//! The mutation engine.
//!
//! Every operation is a pure function from the current [`Snapshot`] (plus
//! arguments) to its successor. Nothing here touches I/O or shared state:
//! the [`Store`](crate::store::Store) runs these functions inside its
//! critical section, publishes the result, and persists it.
//!
//! Two return shapes mirror the two ways an operation can decline:
//!
//! - `Option<Snapshot>` -- `None` is a silent no-op (no session user,
//!   unknown id, already-settled payment).
//! - `Result<Snapshot, Rejection>` -- a domain failure the caller reports
//!   to the user (login, registration, tournament join).
//!
//! A returned snapshot is always complete: related changes (an entry and
//! its fee, a settlement and its balance effect) land together or not at
//! all.
//!
//! # Modules
//!
//! - [`auth`] -- login, registration, logout
//! - [`profile`] -- self-service and admin user edits
//! - [`tournament`] -- tournament lifecycle and joining
//! - [`payment`] -- deposit/withdrawal requests and settlement
//! - [`messaging`] -- chat messages and settings replacement

pub mod auth;
pub mod messaging;
pub mod payment;
pub mod profile;
pub mod tournament;

pub use auth::{authenticate, login, logout, register, start_session};
pub use messaging::{send_message, set_settings};
pub use payment::{add_payment_request, process_payment};
pub use profile::{admin_update_user, update_profile};
pub use tournament::{
    JoinRequest, add_tournament, join_tournament, remove_tournament, update_tournament,
};

use tourney_types::{Snapshot, User, UserId};

/// Mutable access to the user with `id` inside a snapshot being built.
fn user_mut<'a>(snapshot: &'a mut Snapshot, id: &UserId) -> Option<&'a mut User> {
    snapshot.users.iter_mut().find(|u| &u.id == id)
}
