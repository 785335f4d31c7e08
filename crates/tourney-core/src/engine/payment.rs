//! Deposit and withdrawal requests.
//!
//! # State machine
//!
//! ```text
//! PENDING --approve--> APPROVED   (balance += amount for DEPOSIT,
//!    |                             balance -= amount for WITHDRAW)
//!    +-----reject----> REJECTED   (no balance effect)
//! ```
//!
//! A request settles exactly once. Settling a request that is missing or
//! already terminal is a no-op, which makes repeated settlement calls
//! idempotent.
//!
//! Approving a withdrawal larger than the balance drives the balance
//! negative. There is no clamp: the approving admin is trusted to check.

use rust_decimal::Decimal;
use tourney_types::{PaymentId, PaymentRequest, PaymentStatus, PaymentType, Snapshot};

use super::user_mut;

/// Append a new pending request.
///
/// `None` if the request is not `PENDING`, its amount is not strictly
/// positive, or its id is already used. Minimum deposit/withdraw thresholds
/// are the caller's concern.
pub fn add_payment_request(snapshot: &Snapshot, request: PaymentRequest) -> Option<Snapshot> {
    if request.status != PaymentStatus::Pending {
        tracing::warn!(
            payment_id = %request.id,
            status = ?request.status,
            "New payment request must be pending"
        );
        return None;
    }
    if request.amount <= Decimal::ZERO {
        tracing::warn!(
            payment_id = %request.id,
            amount = %request.amount,
            "Payment amount must be positive"
        );
        return None;
    }
    if snapshot.payment(&request.id).is_some() {
        tracing::warn!(payment_id = %request.id, "Duplicate payment id ignored");
        return None;
    }

    let mut next = snapshot.clone();
    next.payments.push(request);
    Some(next)
}

/// Settle a pending request as `status`.
///
/// `None` when the request is unknown, no longer pending, when `status` is
/// itself `PENDING`, or when the balance update would overflow. If the
/// owning user has disappeared the request still settles without a balance
/// effect.
pub fn process_payment(
    snapshot: &Snapshot,
    id: &PaymentId,
    status: PaymentStatus,
) -> Option<Snapshot> {
    if status == PaymentStatus::Pending {
        tracing::debug!(payment_id = %id, "Settlement to PENDING ignored");
        return None;
    }
    let Some(request) = snapshot.payment(id) else {
        tracing::debug!(payment_id = %id, "Settlement of unknown payment ignored");
        return None;
    };
    if request.status.is_terminal() {
        tracing::debug!(payment_id = %id, status = ?request.status, "Payment already settled");
        return None;
    }

    let mut next = snapshot.clone();

    if status == PaymentStatus::Approved {
        if let Some(user) = user_mut(&mut next, &request.user_id) {
            let balance = match request.kind {
                PaymentType::Deposit => user.balance.checked_add(request.amount),
                PaymentType::Withdraw => user.balance.checked_sub(request.amount),
            };
            let Some(balance) = balance else {
                tracing::error!(
                    payment_id = %id,
                    user_id = %request.user_id,
                    "Balance overflow on settlement"
                );
                return None;
            };
            user.balance = balance;
        } else {
            tracing::warn!(
                payment_id = %id,
                user_id = %request.user_id,
                "Approved payment for unknown user; no balance change"
            );
        }
    }

    if let Some(slot) = next.payments.iter_mut().find(|p| &p.id == id) {
        slot.status = status;
    }

    Some(next)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tourney_types::UserId;

    use super::*;
    use crate::engine::fixtures;

    fn request(id: &str, kind: PaymentType, amount: i64) -> PaymentRequest {
        PaymentRequest {
            id: PaymentId::from(id),
            user_id: UserId::from("user-1"),
            kind,
            amount: Decimal::new(amount, 0),
            status: PaymentStatus::Pending,
            method: None,
            account_number: "01811111111".to_owned(),
            transaction_id: None,
            created_at: Utc::now(),
        }
    }

    fn with_request(kind: PaymentType, amount: i64) -> Snapshot {
        let snap = fixtures::logged_in();
        add_payment_request(&snap, request("p1", kind, amount)).unwrap_or(snap)
    }

    fn balance(snap: &Snapshot) -> Option<Decimal> {
        snap.user(&UserId::from("user-1")).map(|u| u.balance)
    }

    #[test]
    fn approve_deposit_credits() {
        let snap = with_request(PaymentType::Deposit, 200);
        let next = process_payment(&snap, &PaymentId::from("p1"), PaymentStatus::Approved);
        assert!(next.is_some());
        if let Some(next) = next {
            assert_eq!(balance(&next), Some(Decimal::new(700, 0)));
            assert_eq!(
                next.payment(&PaymentId::from("p1")).map(|p| p.status),
                Some(PaymentStatus::Approved)
            );
        }
    }

    #[test]
    fn approve_withdraw_may_go_negative() {
        let snap = with_request(PaymentType::Withdraw, 800);
        let next = process_payment(&snap, &PaymentId::from("p1"), PaymentStatus::Approved);
        assert_eq!(next.as_ref().and_then(balance), Some(Decimal::new(-300, 0)));
    }

    #[test]
    fn reject_leaves_balance() {
        let snap = with_request(PaymentType::Deposit, 200);
        let next = process_payment(&snap, &PaymentId::from("p1"), PaymentStatus::Rejected);
        assert!(next.is_some());
        if let Some(next) = next {
            assert_eq!(balance(&next), balance(&snap));
            assert_eq!(next.users, snap.users);
            assert_eq!(
                next.payment(&PaymentId::from("p1")).map(|p| p.status),
                Some(PaymentStatus::Rejected)
            );
        }
    }

    #[test]
    fn second_settlement_is_noop() {
        let snap = with_request(PaymentType::Deposit, 200);
        let id = PaymentId::from("p1");
        let settled = process_payment(&snap, &id, PaymentStatus::Approved);
        assert!(settled.is_some());
        if let Some(settled) = settled {
            assert!(process_payment(&settled, &id, PaymentStatus::Approved).is_none());
            assert!(process_payment(&settled, &id, PaymentStatus::Rejected).is_none());
        }
    }

    #[test]
    fn approve_for_removed_user_still_settles() {
        let mut snap = with_request(PaymentType::Deposit, 200);
        snap.users.retain(|u| u.id != UserId::from("user-1"));
        let next = process_payment(&snap, &PaymentId::from("p1"), PaymentStatus::Approved);
        assert!(next.is_some());
        if let Some(next) = next {
            assert_eq!(next.users, snap.users);
            assert_eq!(
                next.payment(&PaymentId::from("p1")).map(|p| p.status),
                Some(PaymentStatus::Approved)
            );
        }
    }

    #[test]
    fn settle_to_pending_is_noop() {
        let snap = with_request(PaymentType::Deposit, 200);
        assert!(process_payment(&snap, &PaymentId::from("p1"), PaymentStatus::Pending).is_none());
    }

    #[test]
    fn unknown_payment_is_noop() {
        let snap = fixtures::snapshot();
        assert!(process_payment(&snap, &PaymentId::from("nope"), PaymentStatus::Approved).is_none());
    }

    #[test]
    fn add_validates_request() {
        let snap = fixtures::snapshot();
        assert!(add_payment_request(&snap, request("p0", PaymentType::Deposit, 0)).is_none());

        let mut settled = request("p2", PaymentType::Deposit, 100);
        settled.status = PaymentStatus::Approved;
        assert!(add_payment_request(&snap, settled).is_none());

        let snap = with_request(PaymentType::Deposit, 100);
        assert!(add_payment_request(&snap, request("p1", PaymentType::Deposit, 100)).is_none());
    }

    #[test]
    fn add_ignores_minimum_thresholds() {
        // minDeposit is 100; the engine does not enforce it.
        let snap = fixtures::snapshot();
        let next = add_payment_request(&snap, request("p3", PaymentType::Deposit, 5));
        assert_eq!(next.map(|s| s.payments.len()), Some(1));
    }
}
