//! Enumeration types for the tournament entry store.
//!
//! Variants serialize in SCREAMING case (`"ADMIN"`, `"SOLO"`, `"PENDING"`)
//! to match the persisted snapshot shape consumed by the presentation layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// The role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// Operator account: manages tournaments, users and payments.
    Admin,
    /// Regular account that joins tournaments.
    Player,
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

/// Team size of a tournament entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum MatchType {
    /// One player.
    Solo,
    /// Two players.
    Duo,
    /// Four players.
    Squad,
}

impl MatchType {
    /// Number of display names an entry of this type normally carries.
    pub const fn team_size(self) -> usize {
        match self {
            Self::Solo => 1,
            Self::Duo => 2,
            Self::Squad => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// Direction of a payment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum PaymentType {
    /// Money paid in by the player; credited on approval.
    Deposit,
    /// Money paid out to the player; debited on approval.
    Withdraw,
}

/// Settlement state of a payment request.
///
/// `Pending` is the only non-terminal state. `Approved` and `Rejected` are
/// terminal: once a request leaves `Pending` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum PaymentStatus {
    /// Waiting for an admin decision.
    Pending,
    /// Accepted; the balance effect has been applied.
    Approved,
    /// Declined; no balance effect.
    Rejected,
}

impl PaymentStatus {
    /// Returns `true` for `Approved` and `Rejected`.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Mobile payout channel used for a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum PaymentMethod {
    /// bKash mobile wallet.
    Bkash,
    /// Nagad mobile wallet.
    Nagad,
}
