//! Tournament lifecycle and joining.
//!
//! Admin operations (`add`, `remove`, `update`) edit the tournament list
//! and silently ignore unknown or duplicate ids. [`join_tournament`] creates
//! an [`Entry`] in the same snapshot that deducts its fee.
//! `update_tournament` replaces the whole record, roster included, so
//! callers patching a single field start from the current record.

use rust_decimal::Decimal;
use tourney_types::{Entry, MatchType, Snapshot, Tournament, TournamentId};

use super::user_mut;
use crate::error::Rejection;

// ---------------------------------------------------------------------------
// Admin lifecycle
// ---------------------------------------------------------------------------

/// Append a tournament. `None` if its id is already taken.
pub fn add_tournament(snapshot: &Snapshot, tournament: Tournament) -> Option<Snapshot> {
    if snapshot.tournament(&tournament.id).is_some() {
        tracing::warn!(tournament_id = %tournament.id, "Duplicate tournament id ignored");
        return None;
    }
    let mut next = snapshot.clone();
    next.tournaments.push(tournament);
    Some(next)
}

/// Remove the tournament with `id`. `None` if absent.
///
/// Entries go with it. No refunds are issued and users' joined-match lists
/// keep the id.
pub fn remove_tournament(snapshot: &Snapshot, id: &TournamentId) -> Option<Snapshot> {
    snapshot.tournament(id)?;
    let mut next = snapshot.clone();
    next.tournaments.retain(|t| &t.id != id);
    Some(next)
}

/// Replace the tournament with the same id by `updated`, roster included.
/// `None` if absent.
pub fn update_tournament(snapshot: &Snapshot, updated: Tournament) -> Option<Snapshot> {
    let mut next = snapshot.clone();
    let Some(slot) = next.tournaments.iter_mut().find(|t| t.id == updated.id) else {
        tracing::debug!(tournament_id = %updated.id, "Update for unknown tournament ignored");
        return None;
    };
    if updated.players != slot.players {
        tracing::warn!(
            tournament_id = %updated.id,
            before = slot.players.len(),
            after = updated.players.len(),
            "Tournament update replaces the roster"
        );
    }
    *slot = updated;
    Some(next)
}

// ---------------------------------------------------------------------------
// Joining
// ---------------------------------------------------------------------------

/// Parameters for a tournament join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// The tournament to join.
    pub tournament_id: TournamentId,
    /// In-game names of the players on the entry.
    pub names: Vec<String>,
    /// Team size.
    pub match_type: MatchType,
    /// Fee to deduct from the session user's balance.
    pub fee: Decimal,
}

/// Enter the session user into a tournament and charge the fee.
///
/// Checks run in order and the first failure wins: a session user exists,
/// their balance covers the fee, the tournament exists, the fee is not
/// negative. On success the entry, the balance deduction and the
/// joined-matches update are all in the returned snapshot.
///
/// # Errors
///
/// Returns [`Rejection::NotLoggedIn`], [`Rejection::InsufficientBalance`],
/// [`Rejection::TournamentNotFound`], [`Rejection::InvalidAmount`], or
/// [`Rejection::BalanceOverflow`].
pub fn join_tournament(snapshot: &Snapshot, request: JoinRequest) -> Result<Snapshot, Rejection> {
    let user = snapshot.current_user().ok_or(Rejection::NotLoggedIn)?;
    if user.balance < request.fee {
        return Err(Rejection::InsufficientBalance);
    }
    if snapshot.tournament(&request.tournament_id).is_none() {
        return Err(Rejection::TournamentNotFound);
    }
    if request.fee < Decimal::ZERO {
        return Err(Rejection::InvalidAmount);
    }
    let balance = user
        .balance
        .checked_sub(request.fee)
        .ok_or(Rejection::BalanceOverflow)?;
    let user_id = user.id.clone();

    let mut next = snapshot.clone();

    let tournament = next
        .tournaments
        .iter_mut()
        .find(|t| t.id == request.tournament_id)
        .ok_or(Rejection::TournamentNotFound)?;
    tournament.players.push(Entry {
        user_id: user_id.clone(),
        names: request.names,
        match_type: request.match_type,
        entry_paid: request.fee,
    });

    let user = user_mut(&mut next, &user_id).ok_or(Rejection::NotLoggedIn)?;
    user.balance = balance;
    user.joined_matches.push(request.tournament_id);

    Ok(next)
}

#[cfg(test)]
mod tests {
    use tourney_types::UserId;

    use super::*;
    use crate::engine::fixtures;

    fn join(fee: i64, tournament: &str) -> JoinRequest {
        JoinRequest {
            tournament_id: TournamentId::from(tournament),
            names: vec!["A".to_owned()],
            match_type: MatchType::Solo,
            fee: Decimal::new(fee, 0),
        }
    }

    #[test]
    fn join_deducts_fee_and_appends_entry() {
        let snap = fixtures::logged_in();
        let next = join_tournament(&snap, join(100, "t1"));
        assert!(next.is_ok());
        if let Ok(next) = next {
            let user = next.current_user();
            assert_eq!(user.map(|u| u.balance), Some(Decimal::new(400, 0)));
            assert_eq!(
                user.map(|u| u.joined_matches.clone()),
                Some(vec![TournamentId::from("t1")])
            );

            let roster = next
                .tournament(&TournamentId::from("t1"))
                .map(|t| t.players.clone())
                .unwrap_or_default();
            assert_eq!(roster.len(), 1);
            assert_eq!(roster.first().map(|e| e.entry_paid), Some(Decimal::new(100, 0)));
            assert_eq!(roster.first().map(|e| e.user_id.clone()), Some(UserId::from("user-1")));
        }
    }

    #[test]
    fn join_requires_session_first() {
        // Logged out AND unknown tournament: the session check wins.
        let snap = fixtures::snapshot();
        let result = join_tournament(&snap, join(1_000, "missing"));
        assert_eq!(result.err(), Some(Rejection::NotLoggedIn));
    }

    #[test]
    fn balance_checked_before_tournament() {
        let snap = fixtures::logged_in();
        let result = join_tournament(&snap, join(1_000, "missing"));
        assert_eq!(result.err(), Some(Rejection::InsufficientBalance));
    }

    #[test]
    fn unknown_tournament_rejected() {
        let snap = fixtures::logged_in();
        let result = join_tournament(&snap, join(100, "missing"));
        assert_eq!(result.err(), Some(Rejection::TournamentNotFound));
    }

    #[test]
    fn negative_fee_rejected() {
        let snap = fixtures::logged_in();
        let result = join_tournament(&snap, join(-50, "t1"));
        assert_eq!(result.err(), Some(Rejection::InvalidAmount));
    }

    #[test]
    fn exact_balance_is_enough() {
        let snap = fixtures::logged_in();
        let next = join_tournament(&snap, join(500, "t1"));
        assert_eq!(
            next.ok().and_then(|s| s.current_user().map(|u| u.balance)),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let snap = fixtures::snapshot();
        assert!(add_tournament(&snap, fixtures::tournament("t1")).is_none());
        let next = add_tournament(&snap, fixtures::tournament("t2"));
        assert_eq!(next.map(|s| s.tournaments.len()), Some(2));
    }

    #[test]
    fn remove_unknown_is_noop() {
        let snap = fixtures::snapshot();
        assert!(remove_tournament(&snap, &TournamentId::from("t9")).is_none());
        let next = remove_tournament(&snap, &TournamentId::from("t1"));
        assert_eq!(next.map(|s| s.tournaments.len()), Some(0));
    }

    #[test]
    fn update_replaces_whole_record() {
        let snap = fixtures::snapshot();
        let mut replacement = fixtures::tournament("t1");
        replacement.title = "Renamed".to_owned();
        replacement
            .metadata
            .insert("map".to_owned(), serde_json::json!("Kalahari"));
        replacement.players.push(Entry {
            user_id: UserId::from("user-1"),
            names: vec!["A".to_owned()],
            match_type: MatchType::Solo,
            entry_paid: Decimal::new(20, 0),
        });

        let next = update_tournament(&snap, replacement.clone());
        assert_eq!(
            next.as_ref().and_then(|s| s.tournament(&TournamentId::from("t1"))),
            Some(&replacement)
        );
    }

    #[test]
    fn update_with_empty_roster_clears_entries() {
        let joined = join_tournament(&fixtures::logged_in(), join(100, "t1")).ok();
        assert!(joined.is_some());
        let Some(joined) = joined else { return };

        let next = update_tournament(&joined, fixtures::tournament("t1"));
        let t = next.as_ref().and_then(|s| s.tournament(&TournamentId::from("t1")));
        assert_eq!(t.map(|t| t.players.len()), Some(0));
        // Balances are untouched; refunds are not part of an update.
        assert_eq!(
            next.as_ref().and_then(|s| s.current_user().map(|u| u.balance)),
            Some(Decimal::new(400, 0))
        );
    }

    #[test]
    fn update_unknown_is_noop() {
        let snap = fixtures::snapshot();
        assert!(update_tournament(&snap, fixtures::tournament("t9")).is_none());
    }
}
