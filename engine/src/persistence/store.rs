//! Snapshot stores
//!
//! A store holds at most one [`PersistedRecord`]. `commit` replaces it in
//! place; there is never a second record.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use super::snapshot::PersistedRecord;
use super::PersistenceError;

/// Backing storage for the single persisted record
pub trait SnapshotStore: Send {
    /// The stored record, or `None` when nothing was saved yet
    fn fetch(&self) -> Result<Option<PersistedRecord>, PersistenceError>;

    /// Replace the stored record
    fn commit(&mut self, record: &PersistedRecord) -> Result<(), PersistenceError>;
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    record: Option<PersistedRecord>,
    commits: usize,
    fail_commits: bool,
    fail_fetches: bool,
}

/// Shared in-memory store.
///
/// Clones share the same record, so a test can keep a handle after giving
/// the store to a navigator. Failure switches simulate an unavailable
/// backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record
    pub fn with_record(record: PersistedRecord) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.record = Some(record);
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, PersistenceError> {
        self.inner
            .lock()
            .map_err(|_| PersistenceError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Current record, bypassing failure switches
    pub fn record(&self) -> Option<PersistedRecord> {
        self.lock().ok().and_then(|inner| inner.record.clone())
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> usize {
        self.lock().map(|inner| inner.commits).unwrap_or(0)
    }

    pub fn set_fail_commits(&self, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_commits = fail;
        }
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_fetches = fail;
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn fetch(&self) -> Result<Option<PersistedRecord>, PersistenceError> {
        let inner = self.lock()?;
        if inner.fail_fetches {
            return Err(PersistenceError::Unavailable(
                "memory store fetch disabled".to_string(),
            ));
        }
        Ok(inner.record.clone())
    }

    fn commit(&mut self, record: &PersistedRecord) -> Result<(), PersistenceError> {
        let mut inner = self.lock()?;
        if inner.fail_commits {
            return Err(PersistenceError::Unavailable(
                "memory store commit disabled".to_string(),
            ));
        }
        inner.record = Some(record.clone());
        inner.commits += 1;
        Ok(())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Single JSON file on disk.
///
/// Writes go to a temp file first and are renamed over the target, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SnapshotStore for JsonFileStore {
    fn fetch(&self) -> Result<Option<PersistedRecord>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            PersistenceError::Unavailable(format!("read {}: {}", self.path.display(), e))
        })?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let Some((record, failed)) = PersistedRecord::from_value_lenient(value) else {
            warn!(path = %self.path.display(), "save file is not a record object; ignoring it");
            return Ok(None);
        };
        if !failed.is_empty() {
            warn!(path = %self.path.display(), fields = ?failed, "save file fields failed to decode; using defaults");
        }
        Ok(Some(record))
    }

    fn commit(&mut self, record: &PersistedRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    PersistenceError::Unavailable(format!("create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(record)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).map_err(|e| {
            PersistenceError::Unavailable(format!("write {}: {}", temp_path.display(), e))
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            PersistenceError::Unavailable(format!("rename to {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), "record committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_replaces_in_place() {
        let mut store = MemoryStore::new();
        assert_eq!(store.fetch().unwrap(), None);

        let mut record = PersistedRecord::create();
        store.commit(&record).unwrap();
        record.budget = Some(12);
        store.commit(&record).unwrap();

        assert_eq!(store.commit_count(), 2);
        assert_eq!(store.record().unwrap().budget, Some(12));
    }

    #[test]
    fn test_memory_store_failure_switches() {
        let mut store = MemoryStore::new();
        store.set_fail_commits(true);
        assert!(matches!(
            store.commit(&PersistedRecord::create()),
            Err(PersistenceError::Unavailable(_))
        ));
        assert_eq!(store.commit_count(), 0);

        store.set_fail_fetches(true);
        assert!(store.fetch().is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = MemoryStore::new();
        let mut owned = handle.clone();
        owned.commit(&PersistedRecord::create()).unwrap();
        assert!(handle.record().is_some());
    }
}
