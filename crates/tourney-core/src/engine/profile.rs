//! Profile edits.
//!
//! Both operations merge a [`UserPatch`] into one user record. Because the
//! session holds only the user's id, the session view is fresh as soon as
//! the record is replaced.
//!
//! Patches must arrive with `password` already sealed.

use tourney_types::{Snapshot, UserId, UserPatch};

use super::user_mut;

/// Merge `patch` into the session user. `None` without a session.
pub fn update_profile(snapshot: &Snapshot, patch: &UserPatch) -> Option<Snapshot> {
    let Some(id) = snapshot.current_user().map(|u| u.id.clone()) else {
        tracing::debug!("Profile update without a session user ignored");
        return None;
    };
    admin_update_user(snapshot, &id, patch)
}

/// Merge `patch` into the user with `user_id`. `None` if the id is unknown.
///
/// Caller identity is not checked here; admin-only access is enforced by
/// whoever exposes this operation.
pub fn admin_update_user(
    snapshot: &Snapshot,
    user_id: &UserId,
    patch: &UserPatch,
) -> Option<Snapshot> {
    let mut next = snapshot.clone();
    let Some(user) = user_mut(&mut next, user_id) else {
        tracing::debug!(%user_id, "User update for unknown id ignored");
        return None;
    };
    *user = user.merged(patch);
    Some(next)
}
