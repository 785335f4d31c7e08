//! Whole-snapshot persistence.
//!
//! The store writes the complete [`Snapshot`] after every change and reads
//! it back once at startup. There are no partial writes and no versioning:
//! one fixed key maps to one serialized record.
//!
//! Two backends implement [`SnapshotStore`]:
//!
//! - [`FileSnapshotStore`] -- a JSON file `<dir>/<key>.json`, replaced via a
//!   temp file and rename so a crash never leaves a half-written snapshot.
//! - [`MemorySnapshotStore`] -- keeps the serialized record in memory; used
//!   by tests and by callers that want no durable state.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tourney_types::Snapshot;

use crate::error::DbError;

/// Default storage key, shared with earlier browser builds of the app.
pub const STORAGE_KEY: &str = "ff_tourney_v1";

/// A durable home for exactly one snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the saved snapshot, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, DbError>;

    /// Replace the saved snapshot with `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> Result<(), DbError>;
}

// =========================================================================
// File backend
// =========================================================================

/// Snapshot persisted as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
    key: String,
}

impl FileSnapshotStore {
    /// Create a store writing `<dir>/<key>.json`.
    ///
    /// The directory is created on first save.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidKey`] if `key` is empty or contains a path
    /// separator.
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> Result<Self, DbError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(DbError::InvalidKey(key.to_owned()));
        }
        Ok(Self {
            dir: dir.into(),
            key: key.to_owned(),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", self.key))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> DbError {
    DbError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, DbError> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No saved snapshot");
                return Ok(None);
            }
            Err(e) => return Err(io_error(&path, e)),
        };

        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            users = snapshot.users.len(),
            tournaments = snapshot.tournaments.len(),
            "Loaded snapshot"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), DbError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let body = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.temp_path();
        fs::write(&tmp, body).map_err(|e| io_error(&tmp, e))?;

        let path = self.path();
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;

        tracing::trace!(path = %path.display(), "Saved snapshot");
        Ok(())
    }
}

// =========================================================================
// Memory backend
// =========================================================================

/// Snapshot kept as serialized JSON in memory.
///
/// Serializing on save (rather than cloning) makes the memory backend
/// exercise the same wire format as the file backend.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the snapshot cannot be encoded.
    pub fn with_snapshot(snapshot: &Snapshot) -> Result<Self, DbError> {
        let body = serde_json::to_string(snapshot)?;
        Ok(Self {
            slot: Mutex::new(Some(body)),
            saves: AtomicUsize::new(0),
        })
    }

    /// Number of successful saves since creation.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The raw saved record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Poisoned`] if a writer panicked.
    pub fn raw(&self) -> Result<Option<String>, DbError> {
        let slot = self.slot.lock().map_err(|_poisoned| DbError::Poisoned)?;
        Ok(slot.clone())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, DbError> {
        match self.raw()? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), DbError> {
        let body = serde_json::to_string(snapshot)?;
        let mut slot = self.slot.lock().map_err(|_poisoned| DbError::Poisoned)?;
        *slot = Some(body);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_keys() {
        assert!(FileSnapshotStore::new("/tmp", "").is_err());
        assert!(FileSnapshotStore::new("/tmp", "a/b").is_err());
        assert!(FileSnapshotStore::new("/tmp", "..").is_err());
        assert!(FileSnapshotStore::new("/tmp", STORAGE_KEY).is_ok());
    }

    #[test]
    fn file_path_uses_key() {
        let store = FileSnapshotStore::new("/var/lib/tourney", STORAGE_KEY).ok();
        assert_eq!(
            store.map(|s| s.path()),
            Some(PathBuf::from("/var/lib/tourney/ff_tourney_v1.json"))
        );
    }

    #[test]
    fn empty_memory_store_loads_nothing() {
        let store = MemorySnapshotStore::new();
        assert!(matches!(store.load(), Ok(None)));
        assert_eq!(store.save_count(), 0);
    }
}
