//! Localized result messages.
//!
//! [`OpResult`](tourney_types::OpResult) carries a human-readable message
//! rather than a machine code. The catalog here supplies it in the
//! configured [`Locale`]; Bengali is the app's native language.

use serde::Deserialize;

use crate::error::Rejection;

/// Language of result messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    En,
    /// Bengali.
    #[default]
    Bn,
}

/// A successful outcome that carries a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Login succeeded.
    LoggedIn,
    /// Registration succeeded.
    Registered,
    /// Tournament join succeeded.
    Joined,
}

impl Locale {
    /// Message for a successful outcome.
    pub const fn notice(self, notice: Notice) -> &'static str {
        match (self, notice) {
            (Self::En, Notice::LoggedIn) => "Logged in successfully",
            (Self::En, Notice::Registered) => "Account created successfully",
            (Self::En, Notice::Joined) => "Joined the tournament",
            (Self::Bn, Notice::LoggedIn) => "লগইন সফল হয়েছে",
            (Self::Bn, Notice::Registered) => "অ্যাকাউন্ট তৈরি সফল হয়েছে",
            (Self::Bn, Notice::Joined) => "সফলভাবে যোগ দিয়েছেন",
        }
    }

    /// Message for a rejection.
    pub const fn rejection(self, rejection: Rejection) -> &'static str {
        match self {
            Self::En => match rejection {
                Rejection::InvalidCredentials => "Invalid ID or password!",
                Rejection::AccountExists => {
                    "An account with this phone or ID already exists"
                }
                Rejection::NotLoggedIn => "Please log in",
                Rejection::InsufficientBalance => "Insufficient balance",
                Rejection::TournamentNotFound => "Tournament not found",
                Rejection::InvalidAmount => "Invalid amount",
                Rejection::BalanceOverflow => "Balance could not be updated",
            },
            Self::Bn => match rejection {
                Rejection::InvalidCredentials => "আইডি বা পাসওয়ার্ড ভুল!",
                Rejection::AccountExists => "এই ফোন বা আইডি দিয়ে অলরেডি অ্যাকাউন্ট আছে",
                Rejection::NotLoggedIn => "লগইন করুন",
                Rejection::InsufficientBalance => "পর্যাপ্ত ব্যালেন্স নেই",
                Rejection::TournamentNotFound => "টুর্নামেন্ট পাওয়া যায়নি",
                Rejection::InvalidAmount => "অবৈধ পরিমাণ",
                Rejection::BalanceOverflow => "ব্যালেন্স আপডেট করা যায়নি",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bengali() {
        assert_eq!(Locale::default(), Locale::Bn);
        assert_eq!(Locale::Bn.rejection(Rejection::NotLoggedIn), "লগইন করুন");
    }

    #[test]
    fn english_catalog() {
        assert_eq!(
            Locale::En.rejection(Rejection::InsufficientBalance),
            "Insufficient balance"
        );
        assert_eq!(Locale::En.notice(Notice::Joined), "Joined the tournament");
    }
}
