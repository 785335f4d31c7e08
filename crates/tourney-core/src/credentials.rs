//! Credential verification.
//!
//! Login and registration never look at stored credentials directly; they
//! go through a [`CredentialVerifier`]. This keeps the hashing scheme
//! swappable without touching the mutation engine:
//!
//! - [`PlaintextVerifier`] -- stores and compares the password verbatim.
//!   Only for snapshots written by the original browser app.
//! - [`Argon2Verifier`] -- salted Argon2id, stored as a PHC string.

use std::fmt::Debug;
use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde::Deserialize;
use uuid::Uuid;

/// Errors that can occur while sealing a password.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The hasher rejected the input or parameters.
    #[error("failed to hash password: {message}")]
    Hash {
        /// Description of the hashing failure.
        message: String,
    },
}

/// Turns passwords into stored credentials and checks them at login.
pub trait CredentialVerifier: Debug + Send + Sync {
    /// Produce the value stored on the user record for `password`.
    fn seal(&self, password: &str) -> Result<String, CredentialError>;

    /// Returns `true` if `password` matches the stored credential.
    ///
    /// A stored value this verifier cannot parse never matches.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Which verifier the store uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScheme {
    /// Verbatim comparison.
    Plaintext,
    /// Argon2id PHC strings.
    #[default]
    Argon2,
}

impl CredentialScheme {
    /// Build the verifier for this scheme.
    pub fn verifier(self) -> Arc<dyn CredentialVerifier> {
        match self {
            Self::Plaintext => Arc::new(PlaintextVerifier),
            Self::Argon2 => Arc::new(Argon2Verifier::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Plaintext
// ---------------------------------------------------------------------------

/// Stores passwords as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn seal(&self, password: &str) -> Result<String, CredentialError> {
        Ok(password.to_owned())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password == stored
    }
}

// ---------------------------------------------------------------------------
// Argon2
// ---------------------------------------------------------------------------

/// Salted Argon2id hashing with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl Argon2Verifier {
    /// Create a verifier with default Argon2id parameters.
    pub const fn new() -> Self {
        Self
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn seal(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|e| {
            CredentialError::Hash {
                message: format!("salt: {e}"),
            }
        })?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash {
                message: e.to_string(),
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::debug!("Stored credential is not a PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
