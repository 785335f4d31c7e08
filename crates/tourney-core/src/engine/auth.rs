//! Login, registration and logout.

use rust_decimal::Decimal;
use tourney_types::{NewUser, Role, Snapshot, User, UserId};

use crate::credentials::CredentialVerifier;
use crate::error::Rejection;

/// Start a session for the user whose phone or email is `identifier` and
/// whose credential verifies against `password`.
///
/// # Errors
///
/// Returns [`Rejection::InvalidCredentials`] if no user matches. The error
/// does not reveal whether the identifier exists.
pub fn login(
    snapshot: &Snapshot,
    identifier: &str,
    password: &str,
    verifier: &dyn CredentialVerifier,
) -> Result<Snapshot, Rejection> {
    let user = authenticate(snapshot, identifier, password, verifier)?;
    start_session(snapshot, user)
}

/// Find the user whose phone or email is `identifier` and whose credential
/// verifies against `password`. Does not change the snapshot.
///
/// Verification may be slow (Argon2), so callers holding a lock run this
/// against a copy and apply [`start_session`] under the lock.
///
/// # Errors
///
/// Returns [`Rejection::InvalidCredentials`] if no user matches.
pub fn authenticate<'a>(
    snapshot: &'a Snapshot,
    identifier: &str,
    password: &str,
    verifier: &dyn CredentialVerifier,
) -> Result<&'a User, Rejection> {
    snapshot
        .users
        .iter()
        .find(|u| u.has_identifier(identifier) && verifier.verify(password, &u.credential))
        .ok_or(Rejection::InvalidCredentials)
}

/// Log in `authenticated`, a user found by [`authenticate`] on a possibly
/// older snapshot.
///
/// # Errors
///
/// Returns [`Rejection::InvalidCredentials`] if the user no longer exists
/// in `snapshot` or its credential changed since it was verified.
pub fn start_session(snapshot: &Snapshot, authenticated: &User) -> Result<Snapshot, Rejection> {
    let unchanged = snapshot
        .user(&authenticated.id)
        .is_some_and(|u| u.credential == authenticated.credential);
    if !unchanged {
        tracing::debug!(
            user_id = %authenticated.id,
            "Authenticated user changed before session start"
        );
        return Err(Rejection::InvalidCredentials);
    }

    let mut next = snapshot.clone();
    next.current_user_id = Some(authenticated.id.clone());
    Ok(next)
}

/// Create a player account and log it in.
///
/// `credential` is `candidate.password` already sealed by the verifier;
/// the plain password is not stored.
///
/// # Errors
///
/// Returns [`Rejection::AccountExists`] if any user already has the
/// candidate's phone or email (exact match), or the candidate's explicit id.
pub fn register(
    snapshot: &Snapshot,
    candidate: &NewUser,
    credential: String,
) -> Result<Snapshot, Rejection> {
    let taken = snapshot.users.iter().any(|u| {
        u.phone == candidate.phone
            || u.email == candidate.email
            || candidate.id.as_ref() == Some(&u.id)
    });
    if taken {
        return Err(Rejection::AccountExists);
    }

    let user = User {
        id: candidate.id.clone().unwrap_or_else(UserId::new),
        name: candidate.name.clone(),
        phone: candidate.phone.clone(),
        email: candidate.email.clone(),
        credential,
        balance: Decimal::ZERO,
        role: Role::Player,
        joined_matches: Vec::new(),
    };

    let mut next = snapshot.clone();
    next.current_user_id = Some(user.id.clone());
    next.users.push(user);
    Ok(next)
}

/// End the session. `None` if nobody is logged in.
pub fn logout(snapshot: &Snapshot) -> Option<Snapshot> {
    snapshot.current_user_id.as_ref()?;
    let mut next = snapshot.clone();
    next.current_user_id = None;
    Some(next)
}
