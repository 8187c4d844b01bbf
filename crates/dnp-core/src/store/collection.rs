// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage with O(1) lookups and push-based
// change notification via `watch` channels.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A lock-free, reactive collection for a single entity type.
///
/// Uses `DashMap` for O(1) concurrent lookups and a `watch` channel for
/// push-based change notification. Every mutation rebuilds the snapshot,
/// ordered by key so consumers see a stable order.
pub(crate) struct EntityCollection<K, T>
where
    K: Eq + Hash + Ord + Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    by_key: DashMap<K, Arc<T>>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<K, T> EntityCollection<K, T>
where
    K: Eq + Hash + Ord + Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_key: DashMap::new(),
            snapshot,
        }
    }

    /// Insert or update an entity. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: K, entity: T) -> bool {
        let is_new = self.by_key.insert(key, Arc::new(entity)).is_none();
        self.publish();
        is_new
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, key: &K) -> Option<Arc<T>> {
        let removed = self.by_key.remove(key).map(|(_, v)| v);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    /// Replace the whole collection with `items` in a single publish.
    ///
    /// Upserts every incoming entity, then prunes keys absent from the
    /// incoming set. Subscribers never observe a transient empty state.
    pub(crate) fn replace_all(&self, items: impl IntoIterator<Item = (K, T)>) {
        let mut incoming: HashSet<K> = HashSet::new();
        for (key, entity) in items {
            incoming.insert(key.clone());
            self.by_key.insert(key, Arc::new(entity));
        }
        self.by_key.retain(|k, _| incoming.contains(k));
        self.publish();
    }

    /// Apply `f` to the entity under `key` (clone-on-write).
    /// Returns `false` if the key is absent.
    pub(crate) fn modify(&self, key: &K, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let updated = match self.by_key.get_mut(key) {
            Some(mut slot) => {
                f(Arc::make_mut(slot.value_mut()));
                true
            }
            None => false,
        };
        if updated {
            self.publish();
        }
        updated
    }

    pub(crate) fn get(&self, key: &K) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn clear(&self) {
        self.by_key.clear();
        self.publish();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Rebuild the ordered snapshot and broadcast it.
    fn publish(&self) {
        let mut pairs: Vec<(K, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let values: Vec<Arc<T>> = pairs.into_iter().map(|(_, v)| v).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_reports_new_keys() {
        let col: EntityCollection<String, String> = EntityCollection::new();
        assert!(col.upsert("k".into(), "hello".into()));
        assert!(!col.upsert("k".into(), "world".into()));
        assert_eq!(*col.get(&"k".into()).unwrap(), "world");
    }

    #[test]
    fn snapshot_is_ordered_by_key() {
        let col: EntityCollection<u32, &'static str> = EntityCollection::new();
        col.upsert(3, "c");
        col.upsert(1, "a");
        col.upsert(2, "b");

        let snap = col.snapshot();
        let values: Vec<&str> = snap.iter().map(|v| **v).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_publishes_only_on_change() {
        let col: EntityCollection<u32, u32> = EntityCollection::new();
        col.upsert(1, 10);
        let mut rx = col.subscribe();
        rx.mark_unchanged();

        assert!(col.remove(&2).is_none());
        assert!(!rx.has_changed().unwrap());

        assert_eq!(*col.remove(&1).unwrap(), 10);
        assert!(rx.has_changed().unwrap());
        assert!(col.snapshot().is_empty());
    }

    #[test]
    fn replace_all_prunes_missing_keys() {
        let col: EntityCollection<u32, u32> = EntityCollection::new();
        col.upsert(1, 10);
        col.upsert(2, 20);

        col.replace_all([(2, 21), (3, 30)]);

        let snap = col.snapshot();
        let values: Vec<u32> = snap.iter().map(|v| **v).collect();
        assert_eq!(values, vec![21, 30]);
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn modify_updates_in_place() {
        let col: EntityCollection<u32, Vec<u32>> = EntityCollection::new();
        col.upsert(1, vec![1]);
        assert!(col.modify(&1, |v| v.push(2)));
        assert!(!col.modify(&9, |v| v.push(2)));
        assert_eq!(*col.get(&1).unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn subscribers_see_mutations() {
        let col: EntityCollection<u32, u32> = EntityCollection::new();
        let mut rx = col.subscribe();
        col.upsert(1, 1);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
