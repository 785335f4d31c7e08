//! Cross-collection integrity audit.
//!
//! The engine keeps these relationships intact for every snapshot it
//! produces, but snapshots also arrive from disk and profile edits do not
//! check phone/email uniqueness. The audit runs over a loaded snapshot and
//! reports what is broken; it never repairs anything.
//!
//! Checks:
//!
//! ```text
//! users        unique id, unique phone, unique email
//! tournaments  unique id; every entry's user exists and lists the tournament
//! payments     unique id; amount > 0
//! session      references an existing user
//! ```

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use tourney_types::{PaymentId, Snapshot, TournamentId, UserId};

/// The result of auditing one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityReport {
    /// Every relationship holds.
    Consistent,
    /// One or more checks failed, in check order.
    Violations(Vec<Violation>),
}

impl IntegrityReport {
    /// Returns `true` if no violations were found.
    pub const fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent)
    }

    /// The violations found, empty when consistent.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Consistent => &[],
            Self::Violations(v) => v,
        }
    }
}

/// A single broken relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two users share an id.
    DuplicateUserId(UserId),
    /// Two users share a phone number.
    DuplicatePhone(String),
    /// Two users share an email.
    DuplicateEmail(String),
    /// Two tournaments share an id.
    DuplicateTournamentId(TournamentId),
    /// Two payment requests share an id.
    DuplicatePaymentId(PaymentId),
    /// The session points at a user that does not exist.
    DanglingSession(UserId),
    /// A roster entry belongs to a user that does not exist.
    OrphanEntry {
        /// Tournament holding the entry.
        tournament_id: TournamentId,
        /// The missing user.
        user_id: UserId,
    },
    /// A roster entry's user does not list the tournament as joined.
    UnlistedEntry {
        /// Tournament holding the entry.
        tournament_id: TournamentId,
        /// The user whose joined matches omit it.
        user_id: UserId,
    },
    /// A payment request's amount is zero or negative.
    NonPositivePayment(PaymentId),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUserId(id) => write!(f, "duplicate user id {id}"),
            Self::DuplicatePhone(phone) => write!(f, "duplicate phone {phone}"),
            Self::DuplicateEmail(email) => write!(f, "duplicate email {email}"),
            Self::DuplicateTournamentId(id) => write!(f, "duplicate tournament id {id}"),
            Self::DuplicatePaymentId(id) => write!(f, "duplicate payment id {id}"),
            Self::DanglingSession(id) => write!(f, "session references missing user {id}"),
            Self::OrphanEntry {
                tournament_id,
                user_id,
            } => write!(
                f,
                "tournament {tournament_id} has an entry for missing user {user_id}"
            ),
            Self::UnlistedEntry {
                tournament_id,
                user_id,
            } => write!(
                f,
                "user {user_id} is on tournament {tournament_id} but has not joined it"
            ),
            Self::NonPositivePayment(id) => write!(f, "payment {id} has a non-positive amount"),
        }
    }
}

/// Collect every value that appears more than once, in first-repeat order.
fn duplicates<'a, T, I>(values: I) -> Vec<&'a T>
where
    T: Ord + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut out = Vec::new();
    for value in values {
        if !seen.insert(value) && reported.insert(value) {
            out.push(value);
        }
    }
    out
}

/// Audit `snapshot` for broken relationships.
pub fn audit(snapshot: &Snapshot) -> IntegrityReport {
    let mut violations = Vec::new();

    violations.extend(
        duplicates(snapshot.users.iter().map(|u| &u.id))
            .into_iter()
            .map(|id| Violation::DuplicateUserId(id.clone())),
    );
    violations.extend(
        duplicates(snapshot.users.iter().map(|u| u.phone.as_str()))
            .into_iter()
            .map(|p| Violation::DuplicatePhone(p.to_owned())),
    );
    violations.extend(
        duplicates(snapshot.users.iter().map(|u| u.email.as_str()))
            .into_iter()
            .map(|e| Violation::DuplicateEmail(e.to_owned())),
    );
    violations.extend(
        duplicates(snapshot.tournaments.iter().map(|t| &t.id))
            .into_iter()
            .map(|id| Violation::DuplicateTournamentId(id.clone())),
    );
    violations.extend(
        duplicates(snapshot.payments.iter().map(|p| &p.id))
            .into_iter()
            .map(|id| Violation::DuplicatePaymentId(id.clone())),
    );

    if let Some(id) = snapshot
        .current_user_id
        .as_ref()
        .filter(|id| snapshot.user(id).is_none())
    {
        violations.push(Violation::DanglingSession(id.clone()));
    }

    for tournament in &snapshot.tournaments {
        for entry in &tournament.players {
            match snapshot.user(&entry.user_id) {
                None => violations.push(Violation::OrphanEntry {
                    tournament_id: tournament.id.clone(),
                    user_id: entry.user_id.clone(),
                }),
                Some(user) if !user.joined_matches.contains(&tournament.id) => {
                    violations.push(Violation::UnlistedEntry {
                        tournament_id: tournament.id.clone(),
                        user_id: entry.user_id.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    violations.extend(
        snapshot
            .payments
            .iter()
            .filter(|p| p.amount <= Decimal::ZERO)
            .map(|p| Violation::NonPositivePayment(p.id.clone())),
    );

    if violations.is_empty() {
        IntegrityReport::Consistent
    } else {
        IntegrityReport::Violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tourney_types::{Entry, MatchType, PaymentRequest, PaymentStatus, PaymentType, Role};

    use super::*;
    use crate::engine::{self, JoinRequest, fixtures};

    #[test]
    fn fixture_is_consistent() {
        assert!(audit(&fixtures::logged_in()).is_consistent());
    }

    #[test]
    fn engine_join_keeps_snapshot_consistent() {
        let request = JoinRequest {
            tournament_id: TournamentId::from("t1"),
            names: vec!["A".to_owned()],
            match_type: MatchType::Solo,
            fee: Decimal::new(100, 0),
        };
        let next = engine::join_tournament(&fixtures::logged_in(), request);
        assert_eq!(next.map(|s| audit(&s)), Ok(IntegrityReport::Consistent));
    }

    #[test]
    fn duplicate_phone_reported_once() {
        let mut snap = fixtures::snapshot();
        for email in ["x", "y"] {
            snap.users.push(fixtures::user(email, "01800000000", email, 0, Role::Player));
        }
        let report = audit(&snap);
        assert_eq!(
            report.violations(),
            [Violation::DuplicatePhone("01800000000".to_owned())]
        );
    }

    #[test]
    fn dangling_session_reported() {
        let mut snap = fixtures::snapshot();
        snap.current_user_id = Some(UserId::from("ghost"));
        let report = audit(&snap);
        assert_eq!(
            report.violations(),
            [Violation::DanglingSession(UserId::from("ghost"))]
        );
    }

    #[test]
    fn roster_entries_checked_against_users() {
        let mut snap = fixtures::snapshot();
        if let Some(t) = snap.tournaments.first_mut() {
            for user in ["ghost", "user-1"] {
                t.players.push(Entry {
                    user_id: UserId::from(user),
                    names: Vec::new(),
                    match_type: MatchType::Duo,
                    entry_paid: Decimal::ZERO,
                });
            }
        }
        let report = audit(&snap);
        assert_eq!(report.violations().len(), 2);
        assert!(matches!(
            report.violations().first(),
            Some(Violation::OrphanEntry { .. })
        ));
        assert!(matches!(
            report.violations().get(1),
            Some(Violation::UnlistedEntry { .. })
        ));
    }

    #[test]
    fn non_positive_payment_reported() {
        let mut snap = fixtures::snapshot();
        snap.payments.push(PaymentRequest {
            id: PaymentId::from("p1"),
            user_id: UserId::from("user-1"),
            kind: PaymentType::Withdraw,
            amount: Decimal::ZERO,
            status: PaymentStatus::Pending,
            method: None,
            account_number: String::new(),
            transaction_id: None,
            created_at: Utc::now(),
        });
        let report = audit(&snap);
        assert_eq!(
            report.violations(),
            [Violation::NonPositivePayment(PaymentId::from("p1"))]
        );
        assert_eq!(
            report.violations().first().map(ToString::to_string),
            Some("payment p1 has a non-positive amount".to_owned())
        );
    }
}
