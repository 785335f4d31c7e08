//! Core entity structs and the snapshot aggregate.
//!
//! Covers `User`, `Tournament`, `Entry`, `PaymentRequest`, `AppSettings`,
//! `ChatMessage`, and the [`Snapshot`] that owns all of them. Entities never
//! hold references to each other; relationships are id lookups through the
//! snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{MatchType, PaymentMethod, PaymentStatus, PaymentType, Role};
use crate::ids::{MessageId, PaymentId, TournamentId, UserId};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Phone number; one of the two login identifiers.
    pub phone: String,
    /// Email or account handle; the other login identifier.
    pub email: String,
    /// Stored credential as produced by the configured verifier.
    #[serde(rename = "password")]
    pub credential: String,
    /// Wallet balance. Signed: an approved withdrawal may push it below zero.
    #[ts(as = "String")]
    pub balance: Decimal,
    /// Account role.
    pub role: Role,
    /// Tournaments this user has joined, in join order.
    #[serde(default)]
    pub joined_matches: Vec<TournamentId>,
}

impl User {
    /// Return a copy of this user with every field set in `patch` replaced.
    ///
    /// The id is never patched. `patch.password` is copied verbatim into the
    /// credential, so callers must seal it first.
    #[must_use]
    pub fn merged(&self, patch: &UserPatch) -> Self {
        Self {
            id: self.id.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            phone: patch.phone.clone().unwrap_or_else(|| self.phone.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            credential: patch
                .password
                .clone()
                .unwrap_or_else(|| self.credential.clone()),
            balance: patch.balance.unwrap_or(self.balance),
            role: patch.role.unwrap_or(self.role),
            joined_matches: patch
                .joined_matches
                .clone()
                .unwrap_or_else(|| self.joined_matches.clone()),
        }
    }

    /// Returns `true` if `identifier` is this user's phone or email.
    pub fn has_identifier(&self, identifier: &str) -> bool {
        self.phone == identifier || self.email == identifier
    }
}

/// A partial update to a [`User`]. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct UserPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New email or handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New password. Plain text from the caller; the store seals it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub balance: Option<Decimal>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Replacement joined-matches list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_matches: Option<Vec<TournamentId>>,
}

/// Registration input. Balance, role and joined matches are fixed by the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewUser {
    /// Caller-chosen id; a fresh one is generated when absent.
    #[serde(default)]
    pub id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Email or account handle.
    pub email: String,
    /// Plain password.
    pub password: String,
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

/// A participation record on a tournament roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Entry {
    /// The user who paid for the entry.
    pub user_id: UserId,
    /// In-game names of the players on this entry.
    pub names: Vec<String>,
    /// Team size.
    pub match_type: MatchType,
    /// Fee deducted from the user's balance when the entry was recorded.
    #[ts(as = "String")]
    pub entry_paid: Decimal,
}

/// A tournament and its roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Tournament {
    /// Unique identifier.
    pub id: TournamentId,
    /// Display title.
    pub title: String,
    /// Presentation-owned fields (map, schedule, prizes, room details).
    /// Stored as top-level keys beside `id` and `title`; any key not named
    /// here lands in this map and is written back unchanged.
    #[serde(flatten)]
    #[ts(skip)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Roster, in join order.
    #[serde(default)]
    pub players: Vec<Entry>,
}

impl Tournament {
    /// Total fees collected from the roster, or `None` on overflow.
    pub fn collected_fees(&self) -> Option<Decimal> {
        self.players
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.entry_paid))
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// A deposit or withdrawal request awaiting (or past) admin settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PaymentRequest {
    /// Unique identifier.
    pub id: PaymentId,
    /// The user whose balance the request affects.
    pub user_id: UserId,
    /// Deposit or withdrawal.
    #[serde(rename = "type")]
    pub kind: PaymentType,
    /// Strictly positive amount.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Settlement state.
    pub status: PaymentStatus,
    /// Payout channel, if the player chose one.
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    /// The player's wallet number on the payout channel.
    #[serde(default)]
    pub account_number: String,
    /// Transaction reference supplied by the player for deposits.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// When the request was made.
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    #[ts(type = "number")]
    pub created_at: DateTime<Utc>,
}

impl PaymentRequest {
    /// The signed balance change this request causes when approved.
    pub fn signed_amount(&self) -> Option<Decimal> {
        match self.kind {
            PaymentType::Deposit => Some(self.amount),
            PaymentType::Withdraw => Decimal::ZERO.checked_sub(self.amount),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Global application settings. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AppSettings {
    /// bKash number players send deposits to.
    pub admin_bkash: String,
    /// Nagad number players send deposits to.
    pub admin_nagad: String,
    /// Scrolling notice shown on every page.
    pub marquee_notice: String,
    /// Smallest deposit the presentation layer accepts.
    #[ts(as = "String")]
    pub min_deposit: Decimal,
    /// Smallest withdrawal the presentation layer accepts.
    #[ts(as = "String")]
    pub min_withdraw: Decimal,
}

impl AppSettings {
    /// Returns `true` if `amount` reaches the configured minimum for `kind`.
    ///
    /// The store itself never enforces these thresholds.
    pub fn meets_minimum(&self, kind: PaymentType, amount: Decimal) -> bool {
        match kind {
            PaymentType::Deposit => amount >= self.min_deposit,
            PaymentType::Withdraw => amount >= self.min_withdraw,
        }
    }
}

// ---------------------------------------------------------------------------
// Messaging
// ---------------------------------------------------------------------------

/// A direct message between two users. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ChatMessage {
    /// Unique identifier.
    pub id: MessageId,
    /// Author.
    pub sender_id: UserId,
    /// Recipient.
    pub receiver_id: UserId,
    /// Message text.
    pub message: String,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[ts(type = "number")]
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operation result
// ---------------------------------------------------------------------------

/// Outcome of an operation with a meaningful failure mode (login,
/// registration, tournament join).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OpResult {
    /// Whether the operation took effect.
    pub success: bool,
    /// Human-readable, localized message for display.
    pub message: String,
}

impl OpResult {
    /// A successful outcome.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed outcome.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The complete store state at one point in time.
///
/// A snapshot is never mutated once published; every mutation produces a
/// new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// The logged-in user, if any.
    #[serde(default)]
    pub current_user_id: Option<UserId>,
    /// All accounts.
    pub users: Vec<User>,
    /// All tournaments.
    pub tournaments: Vec<Tournament>,
    /// All payment requests.
    #[serde(default)]
    pub payments: Vec<PaymentRequest>,
    /// Global settings.
    pub settings: AppSettings,
    /// Message log, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Snapshot {
    /// The session user, resolved from the user collection.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user_id.as_ref().and_then(|id| self.user(id))
    }

    /// Look up a user by id.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Look up a user by phone or email.
    pub fn user_by_identifier(&self, identifier: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_identifier(identifier))
    }

    /// Look up a tournament by id.
    pub fn tournament(&self, id: &TournamentId) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| &t.id == id)
    }

    /// Look up a payment request by id.
    pub fn payment(&self, id: &PaymentId) -> Option<&PaymentRequest> {
        self.payments.iter().find(|p| &p.id == id)
    }

    /// Requests still waiting for settlement, oldest first.
    pub fn pending_payments(&self) -> impl Iterator<Item = &PaymentRequest> {
        self.payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
    }

    /// Messages exchanged between two users in either direction, oldest
    /// first.
    pub fn conversation<'a>(
        &'a self,
        a: &'a UserId,
        b: &'a UserId,
    ) -> impl Iterator<Item = &'a ChatMessage> {
        self.messages.iter().filter(move |m| {
            (&m.sender_id == a && &m.receiver_id == b)
                || (&m.sender_id == b && &m.receiver_id == a)
        })
    }
}
