//! Type-safe identifier wrappers around opaque strings.
//!
//! Every entity in the store has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. On the wire an ID is a plain
//! string, so snapshots written by older clients (which used short ids such
//! as `"admin-1"`) load unchanged.
//!
//! The `new()` constructors generate UUID v7 strings (time-ordered) for
//! records created inside the store, e.g. registered users and chat messages.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier from a UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a user account.
    UserId
}

define_id! {
    /// Unique identifier for a tournament.
    TournamentId
}

define_id! {
    /// Unique identifier for a deposit or withdrawal request.
    PaymentId
}

define_id! {
    /// Unique identifier for a chat message.
    MessageId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = UserId::new();
        let b = UserId::new();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = TournamentId::from("t1");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"t1\""));

        let restored: Result<TournamentId, _> = serde_json::from_str("\"t1\"");
        assert_eq!(restored.ok(), Some(id));
    }

    #[test]
    fn id_display_matches_inner() {
        let id = PaymentId::from("p1");
        assert_eq!(id.to_string(), "p1");
        assert_eq!(String::from(id), "p1");
    }
}
