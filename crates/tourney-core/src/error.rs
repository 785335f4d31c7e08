//! Error and rejection types for the store.
//!
//! Two separate hierarchies:
//!
//! - [`Rejection`] -- a domain failure of login, registration or tournament
//!   join. Never escapes the store as an `Err`; it is turned into a failed
//!   [`OpResult`](tourney_types::OpResult) with a localized message.
//! - [`StoreError`] -- an infrastructure failure (persistence, hashing,
//!   seed loading) returned to the caller.

use tourney_db::DbError;

use crate::credentials::CredentialError;
use crate::seed::SeedError;

/// Why an operation with a meaningful failure mode did not take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Rejection {
    /// No user matches the identifier and password.
    #[error("invalid identifier or password")]
    InvalidCredentials,

    /// The phone, email or id is already registered.
    #[error("an account with this phone or email already exists")]
    AccountExists,

    /// The operation needs a session user.
    #[error("login required")]
    NotLoggedIn,

    /// The session user's balance is below the fee.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// No tournament has the given id.
    #[error("tournament not found")]
    TournamentNotFound,

    /// The fee is negative.
    #[error("invalid amount")]
    InvalidAmount,

    /// The balance computation overflowed.
    #[error("balance arithmetic overflow")]
    BalanceOverflow,
}

/// Infrastructure failures surfaced by [`Store`](crate::store::Store).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Loading or saving the snapshot failed.
    #[error("persistence error: {source}")]
    Persist {
        /// The underlying persistence error.
        #[from]
        source: DbError,
    },

    /// A password could not be sealed.
    #[error("credential error: {source}")]
    Credential {
        /// The underlying credential error.
        #[from]
        source: CredentialError,
    },

    /// The seed tournament file could not be read.
    #[error("seed error: {source}")]
    Seed {
        /// The underlying seed error.
        #[from]
        source: SeedError,
    },
}
