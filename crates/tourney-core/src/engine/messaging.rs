//! Chat messages and global settings.

use chrono::{DateTime, Utc};
use tourney_types::{AppSettings, ChatMessage, MessageId, Snapshot, UserId};

/// Append a message from the session user to `receiver_id`.
///
/// `None` without a session. The receiver is not checked; readers filter
/// the log themselves.
pub fn send_message(
    snapshot: &Snapshot,
    text: &str,
    receiver_id: &UserId,
    id: MessageId,
    now: DateTime<Utc>,
) -> Option<Snapshot> {
    let Some(sender) = snapshot.current_user() else {
        tracing::debug!("Message without a session user ignored");
        return None;
    };

    let message = ChatMessage {
        id,
        sender_id: sender.id.clone(),
        receiver_id: receiver_id.clone(),
        message: text.to_owned(),
        timestamp: now,
    };

    let mut next = snapshot.clone();
    next.messages.push(message);
    Some(next)
}

/// Replace the settings record wholesale.
pub fn set_settings(snapshot: &Snapshot, settings: AppSettings) -> Snapshot {
    Snapshot {
        settings,
        ..snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::engine::fixtures;

    #[test]
    fn message_is_stamped_with_session_user() {
        let snap = fixtures::logged_in();
        let now = Utc::now();
        let admin = UserId::from("admin-1");
        let next = send_message(&snap, "room id?", &admin, MessageId::from("m1"), now);
        assert!(next.is_some());
        if let Some(next) = next {
            let msg = next.messages.last();
            assert_eq!(msg.map(|m| m.sender_id.as_str()), Some("user-1"));
            assert_eq!(msg.map(|m| m.receiver_id.as_str()), Some("admin-1"));
            assert_eq!(msg.map(|m| m.timestamp), Some(now));
            assert_eq!(next.conversation(&admin, &UserId::from("user-1")).count(), 1);
        }
    }

    #[test]
    fn message_without_session_is_noop() {
        let snap = fixtures::snapshot();
        let next = send_message(
            &snap,
            "hello",
            &UserId::from("admin-1"),
            MessageId::new(),
            Utc::now(),
        );
        assert!(next.is_none());
    }

    #[test]
    fn settings_replaced_wholesale() {
        let snap = fixtures::snapshot();
        let settings = AppSettings {
            admin_bkash: "017".to_owned(),
            admin_nagad: "019".to_owned(),
            marquee_notice: "Finals tonight".to_owned(),
            min_deposit: Decimal::new(-1, 0),
            min_withdraw: Decimal::ZERO,
        };
        let next = set_settings(&snap, settings.clone());
        assert_eq!(next.settings, settings);
        assert_eq!(next.users, snap.users);
    }
}
