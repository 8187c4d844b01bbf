// ── Category exceptions ──
//
// Client-local set of artist ids that stay unblocked even though one of
// their categories is subscribed. Persisted synchronously as a JSON array
// of id strings; no cross-process coordination.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::EntityId;

/// File name of the exception store inside the data directory.
pub const EXCEPTIONS_FILE: &str = "exceptions.json";

/// Persistent set of category exceptions.
pub struct ExceptionStore {
    path: Option<PathBuf>,
    ids: Mutex<HashSet<EntityId>>,
    snapshot: watch::Sender<Arc<HashSet<EntityId>>>,
}

impl ExceptionStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty set. An unreadable or corrupt file is
    /// logged and treated as empty; the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = load(&path);
        debug!(path = %path.display(), count = ids.len(), "loaded category exceptions");
        Self::with_ids(Some(path), ids)
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::with_ids(None, HashSet::new())
    }

    fn with_ids(path: Option<PathBuf>, ids: HashSet<EntityId>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(ids.clone()));
        Self {
            path,
            ids: Mutex::new(ids),
            snapshot,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, artist_id: &EntityId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(artist_id)
    }

    /// Current set of excepted artist ids.
    pub fn snapshot(&self) -> Arc<HashSet<EntityId>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<HashSet<EntityId>>> {
        self.snapshot.subscribe()
    }

    /// Except an artist. Returns `true` if it was not excepted before.
    pub fn except(&self, artist_id: EntityId) -> Result<bool, CoreError> {
        self.update(|ids| ids.insert(artist_id))
    }

    /// Re-block an excepted artist. Returns `true` if it was excepted.
    pub fn reblock(&self, artist_id: &EntityId) -> Result<bool, CoreError> {
        self.update(|ids| ids.remove(artist_id))
    }

    /// Apply `f`; when it reports a change, persist and publish.
    ///
    /// On a write failure the in-memory change is rolled back.
    fn update(&self, f: impl FnOnce(&mut HashSet<EntityId>) -> bool) -> Result<bool, CoreError> {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        let before = ids.clone();
        if !f(&mut ids) {
            return Ok(false);
        }
        if let Some(path) = &self.path {
            if let Err(e) = save(path, &ids) {
                *ids = before;
                return Err(e);
            }
        }
        let snap = Arc::new(ids.clone());
        drop(ids);
        self.snapshot.send_modify(|s| *s = snap);
        Ok(true)
    }
}

fn load(path: &Path) -> HashSet<EntityId> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return HashSet::new(),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "cannot read exceptions file, starting empty"
            );
            return HashSet::new();
        }
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(ids) => ids.into_iter().map(EntityId::from).collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt exceptions file, starting empty");
            HashSet::new()
        }
    }
}

fn save(path: &Path, ids: &HashSet<EntityId>) -> Result<(), CoreError> {
    let storage_err = |message: String| CoreError::Storage {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_err(e.to_string()))?;
    }

    // Sorted for stable, diffable output.
    let sorted: BTreeSet<String> = ids.iter().map(ToString::to_string).collect();
    let json = serde_json::to_string_pretty(&sorted).map_err(|e| storage_err(e.to_string()))?;
    fs::write(path, json).map_err(|e| storage_err(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ExceptionStore::open(dir.path().join(EXCEPTIONS_FILE));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn exceptions_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(EXCEPTIONS_FILE);

        let store = ExceptionStore::open(&path);
        assert!(store.except(EntityId::from("a1")).unwrap());
        assert!(store.except(EntityId::from("a2")).unwrap());
        assert!(!store.except(EntityId::from("a1")).unwrap());
        assert!(store.reblock(&EntityId::from("a2")).unwrap());

        let on_disk: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec!["a1".to_owned()]);

        let reopened = ExceptionStore::open(&path);
        assert!(reopened.contains(&EntityId::from("a1")));
        assert!(!reopened.contains(&EntityId::from("a2")));
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXCEPTIONS_FILE);
        fs::write(&path, "{ not json").unwrap();

        let store = ExceptionStore::open(&path);
        assert!(store.snapshot().is_empty());

        store.except(EntityId::from("a1")).unwrap();
        assert_eq!(ExceptionStore::open(&path).snapshot().len(), 1);
    }

    #[test]
    fn reblocking_unknown_artist_is_a_no_op() {
        let store = ExceptionStore::in_memory();
        assert!(!store.reblock(&EntityId::from("ghost")).unwrap());
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let store = ExceptionStore::in_memory();
        let mut rx = store.subscribe();
        store.except(EntityId::from("a1")).unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().contains(&EntityId::from("a1")));
    }
}
