//! The built-in default snapshot.
//!
//! Used when no snapshot has been persisted yet. Two accounts (one admin,
//! one player with a starting balance), the operator's payment numbers and
//! notice, and whatever tournaments the optional seed file lists.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tourney_types::{AppSettings, Role, Snapshot, Tournament, User, UserId};

use crate::credentials::{CredentialError, CredentialVerifier};

/// Password of both seeded accounts.
const SEED_PASSWORD: &str = "123";

/// Errors that can occur while reading the seed tournament file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("failed to read seed file {}: {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a JSON array of tournaments.
    #[error("failed to parse seed file {}: {source}", path.display())]
    Json {
        /// The file that was being parsed.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },
}

/// Settings shipped with a fresh install.
pub fn default_settings() -> AppSettings {
    AppSettings {
        admin_bkash: "01712345678".to_owned(),
        admin_nagad: "01912345678".to_owned(),
        marquee_notice: "আজকের টুর্নামেন্টে যোগ দিন এবং জিতে নিন আকর্ষণীয় প্রাইজ মানি! \
                         রুম আইডি খেলার ১০ মিনিট আগে দেওয়া হবে।"
            .to_owned(),
        min_deposit: Decimal::new(100, 0),
        min_withdraw: Decimal::new(200, 0),
    }
}

/// Build the default snapshot, sealing seed passwords with `verifier`.
///
/// # Errors
///
/// Returns [`CredentialError`] if a seed password cannot be sealed.
pub fn default_snapshot(
    verifier: &dyn CredentialVerifier,
    tournaments: Vec<Tournament>,
) -> Result<Snapshot, CredentialError> {
    let credential = verifier.seal(SEED_PASSWORD)?;

    let admin = User {
        id: UserId::from("admin-1"),
        name: "Admin".to_owned(),
        phone: "01700000000".to_owned(),
        email: "admin".to_owned(),
        credential: credential.clone(),
        balance: Decimal::ZERO,
        role: Role::Admin,
        joined_matches: Vec::new(),
    };
    let player = User {
        id: UserId::from("user-1"),
        name: "Player One".to_owned(),
        phone: "01800000000".to_owned(),
        email: "player1".to_owned(),
        credential,
        balance: Decimal::new(500, 0),
        role: Role::Player,
        joined_matches: Vec::new(),
    };

    Ok(Snapshot {
        current_user_id: None,
        users: vec![admin, player],
        tournaments,
        payments: Vec::new(),
        settings: default_settings(),
        messages: Vec::new(),
    })
}

/// Read a JSON array of tournaments from `path`.
///
/// # Errors
///
/// Returns [`SeedError::Io`] if the file cannot be read, or
/// [`SeedError::Json`] if it does not hold a tournament array.
pub fn load_tournaments(path: &Path) -> Result<Vec<Tournament>, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tournaments: Vec<Tournament> =
        serde_json::from_str(&contents).map_err(|source| SeedError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(
        path = %path.display(),
        count = tournaments.len(),
        "Loaded seed tournaments"
    );
    Ok(tournaments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Argon2Verifier, PlaintextVerifier};

    #[test]
    fn seed_has_admin_and_funded_player() {
        let snap = default_snapshot(&PlaintextVerifier, Vec::new()).ok();
        assert!(snap.is_some());
        let Some(snap) = snap else { return };

        assert!(snap.current_user_id.is_none());
        assert!(snap.payments.is_empty());
        assert!(snap.messages.is_empty());

        let admin = snap.user(&UserId::from("admin-1"));
        assert_eq!(admin.map(|u| u.role), Some(Role::Admin));
        let player = snap.user_by_identifier("01800000000");
        assert_eq!(player.map(|u| u.balance), Some(Decimal::new(500, 0)));
        assert_eq!(player.map(|u| u.credential.as_str()), Some("123"));
    }

    #[test]
    fn seed_passwords_are_sealed() {
        let verifier = Argon2Verifier::new();
        let snap = default_snapshot(&verifier, Vec::new()).ok();
        let stored = snap
            .as_ref()
            .and_then(|s| s.user(&UserId::from("admin-1")))
            .map(|u| u.credential.clone())
            .unwrap_or_default();
        assert_ne!(stored, SEED_PASSWORD);
        assert!(verifier.verify(SEED_PASSWORD, &stored));
    }

    #[test]
    fn default_thresholds() {
        let settings = default_settings();
        assert_eq!(settings.min_deposit, Decimal::new(100, 0));
        assert_eq!(settings.min_withdraw, Decimal::new(200, 0));
        assert!(settings.marquee_notice.contains("রুম আইডি"));
    }

    #[test]
    fn missing_seed_file_is_io_error() {
        let path = std::env::temp_dir().join("tourney-seed-does-not-exist.json");
        let result = load_tournaments(&path);
        assert!(matches!(result, Err(SeedError::Io { .. })));
    }

    #[test]
    fn seed_file_parses_tournaments() {
        let path = std::env::temp_dir().join(format!(
            "tourney-seed-{}.json",
            uuid::Uuid::now_v7()
        ));
        let json = r#"[{"id":"t1","title":"Bermuda Solo","map":"Bermuda","entryFee":20}]"#;
        assert!(std::fs::write(&path, json).is_ok());

        let tournaments = load_tournaments(&path).unwrap_or_default();
        let _ = std::fs::remove_file(&path);

        assert_eq!(tournaments.len(), 1);
        let first = tournaments.first();
        assert_eq!(first.map(|t| t.title.as_str()), Some("Bermuda Solo"));
        assert_eq!(
            first.and_then(|t| t.metadata.get("map")),
            Some(&serde_json::json!("Bermuda"))
        );
        assert_eq!(first.map(|t| t.players.len()), Some(0));
    }
}
