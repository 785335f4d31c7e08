//! The shared store handle.
//!
//! [`Store`] owns the current [`Snapshot`] and is the only way to change
//! it. Each mutation runs inside the write side of a `tokio::sync::watch`
//! channel:
//!
//! ```text
//! lock ── engine fn(&current) ──> next ── replace ── persist ── unlock
//!                  |
//!                  +── None / Rejection: nothing replaced, nothing written
//! ```
//!
//! Because validation, replacement and the durable write all happen under
//! the same lock, two concurrent calls can never both validate against the
//! same stale snapshot, and the persisted order is the call order.
//!
//! Readers take an `Arc<Snapshot>` via [`Store::snapshot`] or watch for
//! changes with [`Store::subscribe`]. A published snapshot is never
//! mutated.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tourney_db::{FileSnapshotStore, SnapshotStore};
use tourney_types::{
    AppSettings, MatchType, MessageId, NewUser, OpResult, PaymentId, PaymentRequest,
    PaymentStatus, Snapshot, Tournament, TournamentId, UserId, UserPatch,
};

use crate::config::StoreConfig;
use crate::credentials::CredentialVerifier;
use crate::engine::{self, JoinRequest};
use crate::error::{Rejection, StoreError};
use crate::integrity::{self, IntegrityReport};
use crate::locale::{Locale, Notice};
use crate::seed;

/// Options for [`Store::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Language of [`OpResult`] messages.
    pub locale: Locale,
    /// Whether the session user is written to durable storage.
    pub persist_session: bool,
    /// JSON file of tournaments to include when seeding a fresh store.
    pub seed_tournaments_file: Option<PathBuf>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            persist_session: true,
            seed_tournaments_file: None,
        }
    }
}

/// Handle to the current snapshot and its durable copy.
pub struct Store {
    tx: watch::Sender<Arc<Snapshot>>,
    persistence: Arc<dyn SnapshotStore>,
    verifier: Arc<dyn CredentialVerifier>,
    locale: Locale,
    persist_session: bool,
}

impl Store {
    /// Open a store over `persistence`.
    ///
    /// Loads the saved snapshot; if there is none, builds the seed state
    /// and writes it. The loaded snapshot is audited and any violations
    /// are logged, but they do not prevent opening.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading, seeding or the initial write
    /// fails.
    pub fn open(
        persistence: Arc<dyn SnapshotStore>,
        verifier: Arc<dyn CredentialVerifier>,
        options: StoreOptions,
    ) -> Result<Self, StoreError> {
        let StoreOptions {
            locale,
            persist_session,
            seed_tournaments_file,
        } = options;

        let (snapshot, seeded) = if let Some(saved) = persistence.load()? {
            tracing::info!(
                users = saved.users.len(),
                tournaments = saved.tournaments.len(),
                payments = saved.payments.len(),
                "Loaded persisted snapshot"
            );
            (saved, false)
        } else {
            let tournaments = match &seed_tournaments_file {
                Some(path) => seed::load_tournaments(path)?,
                None => Vec::new(),
            };
            tracing::info!(
                tournaments = tournaments.len(),
                "No persisted snapshot; seeding default state"
            );
            (seed::default_snapshot(verifier.as_ref(), tournaments)?, true)
        };

        if let IntegrityReport::Violations(violations) = integrity::audit(&snapshot) {
            for violation in &violations {
                tracing::warn!(%violation, "Snapshot integrity violation");
            }
        }

        let (tx, _rx) = watch::channel(Arc::new(snapshot));
        let store = Self {
            tx,
            persistence,
            verifier,
            locale,
            persist_session,
        };

        if seeded {
            store.persist(&store.snapshot())?;
        }
        Ok(store)
    }

    /// Open a file-backed store as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage key is invalid or
    /// [`Store::open`] fails.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let persistence =
            FileSnapshotStore::new(config.storage.data_dir.clone(), &config.storage.key)?;
        tracing::info!(
            path = %persistence.path().display(),
            scheme = ?config.credentials.scheme,
            "Opening file-backed store"
        );
        let options = StoreOptions {
            locale: config.locale,
            persist_session: config.storage.persist_session,
            seed_tournaments_file: config.seed.tournaments_file.clone(),
        };
        Self::open(
            Arc::new(persistence),
            config.credentials.scheme.verifier(),
            options,
        )
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.tx.borrow())
    }

    /// A receiver notified whenever the snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// Language of result messages.
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Audit the current snapshot.
    pub fn audit(&self) -> IntegrityReport {
        integrity::audit(&self.snapshot())
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Log in with a phone number or email and a password.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the new session cannot be persisted.
    pub fn login(&self, identifier: &str, password: &str) -> Result<OpResult, StoreError> {
        // Verify against a copy so hashing never runs under the write lock.
        let current = self.snapshot();
        let outcome = match engine::authenticate(
            &current,
            identifier,
            password,
            self.verifier.as_ref(),
        ) {
            Ok(user) => self.apply_checked("login", |s| engine::start_session(s, user))?,
            Err(rejection) => Err(rejection),
        };
        if outcome.is_ok() {
            tracing::info!(user_id = ?self.snapshot().current_user_id, "User logged in");
        }
        Ok(self.respond(outcome, Notice::LoggedIn))
    }

    /// Register a player account and log it in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the password cannot be sealed or the new
    /// account cannot be persisted.
    pub fn register(&self, candidate: &NewUser) -> Result<OpResult, StoreError> {
        let credential = self.verifier.seal(&candidate.password)?;
        let outcome = self.apply_checked("register", |s| {
            engine::register(s, candidate, credential)
        })?;
        if outcome.is_ok() {
            tracing::info!(user_id = ?self.snapshot().current_user_id, "User registered");
        }
        Ok(self.respond(outcome, Notice::Registered))
    }

    /// End the session. A no-op when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn logout(&self) -> Result<(), StoreError> {
        if self.apply("logout", engine::logout)? {
            tracing::info!("User logged out");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Merge `patch` into the session user. A no-op without a session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a new password cannot be sealed or the
    /// change cannot be persisted.
    pub fn update_profile(&self, patch: UserPatch) -> Result<(), StoreError> {
        let patch = self.sealed(patch)?;
        self.apply("update_profile", |s| engine::update_profile(s, &patch))?;
        Ok(())
    }

    /// Merge `patch` into any user. A no-op if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a new password cannot be sealed or the
    /// change cannot be persisted.
    pub fn admin_update_user(&self, user_id: &UserId, patch: UserPatch) -> Result<(), StoreError> {
        let patch = self.sealed(patch)?;
        self.apply("admin_update_user", |s| {
            engine::admin_update_user(s, user_id, &patch)
        })?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tournaments
    // -----------------------------------------------------------------------

    /// Add a tournament. A no-op if its id is taken.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn add_tournament(&self, tournament: Tournament) -> Result<(), StoreError> {
        self.apply("add_tournament", |s| engine::add_tournament(s, tournament))?;
        Ok(())
    }

    /// Remove a tournament. A no-op if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn remove_tournament(&self, id: &TournamentId) -> Result<(), StoreError> {
        self.apply("remove_tournament", |s| engine::remove_tournament(s, id))?;
        Ok(())
    }

    /// Replace the tournament with the same id, roster included. A no-op if
    /// the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn update_tournament(&self, tournament: Tournament) -> Result<(), StoreError> {
        self.apply("update_tournament", |s| {
            engine::update_tournament(s, tournament)
        })?;
        Ok(())
    }

    /// Enter the session user into a tournament, charging `fee`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn join_tournament(
        &self,
        tournament_id: &TournamentId,
        names: Vec<String>,
        match_type: MatchType,
        fee: Decimal,
    ) -> Result<OpResult, StoreError> {
        let request = JoinRequest {
            tournament_id: tournament_id.clone(),
            names,
            match_type,
            fee,
        };
        let outcome = self.apply_checked("join_tournament", |s| {
            engine::join_tournament(s, request)
        })?;
        if outcome.is_ok() {
            tracing::info!(
                tournament_id = %tournament_id,
                fee = %fee,
                "Tournament joined"
            );
        }
        Ok(self.respond(outcome, Notice::Joined))
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    /// Submit a pending deposit or withdrawal request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn add_payment_request(&self, request: PaymentRequest) -> Result<(), StoreError> {
        self.apply("add_payment_request", |s| {
            engine::add_payment_request(s, request)
        })?;
        Ok(())
    }

    /// Settle a pending request. A no-op if it is unknown or already
    /// settled.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn process_payment(&self, id: &PaymentId, status: PaymentStatus) -> Result<(), StoreError> {
        if self.apply("process_payment", |s| engine::process_payment(s, id, status))? {
            tracing::info!(payment_id = %id, status = ?status, "Payment settled");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Settings and messaging
    // -----------------------------------------------------------------------

    /// Replace the settings record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn set_settings(&self, settings: AppSettings) -> Result<(), StoreError> {
        self.apply("set_settings", |s| Some(engine::set_settings(s, settings)))?;
        Ok(())
    }

    /// Send a message from the session user. A no-op without a session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    pub fn send_message(&self, text: &str, receiver_id: &UserId) -> Result<(), StoreError> {
        self.apply("send_message", |s| {
            engine::send_message(s, text, receiver_id, MessageId::new(), Utc::now())
        })?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Run `mutation` against the current snapshot under the write lock.
    ///
    /// Returns `true` if a different snapshot was published. The snapshot
    /// stays published even when the durable write fails.
    fn apply(
        &self,
        op: &'static str,
        mutation: impl FnOnce(&Snapshot) -> Option<Snapshot>,
    ) -> Result<bool, StoreError> {
        let mut persisted = Ok(());
        let changed = self.tx.send_if_modified(|current| {
            let Some(next) = mutation(&**current) else {
                return false;
            };
            if next == **current {
                return false;
            }
            *current = Arc::new(next);
            persisted = self.persist(&**current);
            true
        });

        if changed {
            tracing::debug!(op, "Mutation applied");
        } else {
            tracing::debug!(op, "Mutation had no effect");
        }
        persisted?;
        Ok(changed)
    }

    /// [`Store::apply`] for operations that report why they declined.
    fn apply_checked(
        &self,
        op: &'static str,
        mutation: impl FnOnce(&Snapshot) -> Result<Snapshot, Rejection>,
    ) -> Result<Result<(), Rejection>, StoreError> {
        let mut rejection = None;
        self.apply(op, |s| match mutation(s) {
            Ok(next) => Some(next),
            Err(r) => {
                rejection = Some(r);
                None
            }
        })?;
        Ok(rejection.map_or(Ok(()), Err))
    }

    /// Write `snapshot` durably, dropping the session if configured to.
    fn persist(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let result = if self.persist_session || snapshot.current_user_id.is_none() {
            self.persistence.save(snapshot)
        } else {
            self.persistence.save(&Snapshot {
                current_user_id: None,
                ..snapshot.clone()
            })
        };
        result.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist snapshot");
            StoreError::from(e)
        })
    }

    /// Seal the password in `patch`, if it carries one.
    fn sealed(&self, patch: UserPatch) -> Result<UserPatch, StoreError> {
        let password = match &patch.password {
            Some(plain) => Some(self.verifier.seal(plain)?),
            None => None,
        };
        Ok(UserPatch { password, ..patch })
    }

    /// Turn an operation outcome into a localized [`OpResult`].
    fn respond(&self, outcome: Result<(), Rejection>, notice: Notice) -> OpResult {
        match outcome {
            Ok(()) => OpResult::ok(self.locale.notice(notice)),
            Err(rejection) => {
                tracing::warn!(%rejection, "Operation rejected");
                OpResult::fail(self.locale.rejection(rejection))
            }
        }
    }
}
