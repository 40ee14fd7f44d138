//! In-memory [`CoordinationStore`] implementation backed by [`DashMap`].
//!
//! Provides concurrent read/write access without external locking.
//! Suitable for development, testing, and single-node deployments.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::storage::engine::CoordinationStore;
use crate::storage::record::{now_millis, Node, NodeMetadata};

/// In-memory coordination store backed by [`DashMap`].
///
/// Writes to distinct paths do not contend; overwriting an existing path
/// bumps the node's version and keeps its creation time.
pub struct HashMapCoordinationStore {
    nodes: DashMap<String, Node>,
}

impl HashMapCoordinationStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
        }
    }
}

impl Default for HashMapCoordinationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinationStore for HashMapCoordinationStore {
    fn put(&self, path: &str, data: Vec<u8>) -> anyhow::Result<Option<Node>> {
        let now = now_millis();
        match self.nodes.entry(path.to_string()) {
            Entry::Occupied(mut slot) => {
                let mut metadata = slot.get().metadata.clone();
                metadata.on_update(now);
                Ok(Some(slot.insert(Node { data, metadata })))
            }
            Entry::Vacant(slot) => {
                slot.insert(Node {
                    data,
                    metadata: NodeMetadata::new(now),
                });
                Ok(None)
            }
        }
    }

    fn get(&self, path: &str) -> anyhow::Result<Option<Node>> {
        Ok(self.nodes.get(path).map(|n| n.clone()))
    }

    fn remove(&self, path: &str) -> anyhow::Result<Option<Node>> {
        Ok(self.nodes.remove(path).map(|(_, n)| n))
    }

    fn contains_key(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    fn list(&self, prefix: &str) -> Vec<String> {
        let base = prefix.trim_end_matches('/');
        let mut paths: Vec<String> = self
            .nodes
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|path| is_at_or_below(path, base))
            .collect();
        paths.sort();
        paths
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn clear(&self) {
        self.nodes.clear();
    }
}

/// Whether `path` is `base` itself or lies in a level below it.
fn is_at_or_below(path: &str, base: &str) -> bool {
    path.strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove_round_trip() {
        let store = HashMapCoordinationStore::new();
        assert!(store.put("/a/1", b"one".to_vec()).unwrap().is_none());

        let node = store.get("/a/1").unwrap().unwrap();
        assert_eq!(node.data, b"one");
        assert_eq!(node.metadata.version, 1);

        let removed = store.remove("/a/1").unwrap().unwrap();
        assert_eq!(removed.data, b"one");
        assert!(store.get("/a/1").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn overwrite_bumps_version_and_returns_previous() {
        let store = HashMapCoordinationStore::new();
        store.put("/a/1", b"one".to_vec()).unwrap();
        let previous = store.put("/a/1", b"two".to_vec()).unwrap().unwrap();
        assert_eq!(previous.data, b"one");

        let node = store.get("/a/1").unwrap().unwrap();
        assert_eq!(node.data, b"two");
        assert_eq!(node.metadata.version, 2);
        assert_eq!(node.metadata.creation_time, previous.metadata.creation_time);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_filters_by_prefix_and_sorts() {
        let store = HashMapCoordinationStore::new();
        store.put("/acks/s2/r1", Vec::new()).unwrap();
        store.put("/acks/s1/r2", Vec::new()).unwrap();
        store.put("/acks/s1/r1", Vec::new()).unwrap();
        store.put("/other/x", Vec::new()).unwrap();

        assert_eq!(
            store.list("/acks/s1/"),
            vec!["/acks/s1/r1".to_string(), "/acks/s1/r2".to_string()]
        );
        assert_eq!(store.list("/acks").len(), 3);
    }

    #[test]
    fn list_matches_whole_path_levels() {
        let store = HashMapCoordinationStore::new();
        store.put("/acks/s1/r1", Vec::new()).unwrap();
        store.put("/acks/s10/r1", Vec::new()).unwrap();
        store.put("/acks2/s1/r1", Vec::new()).unwrap();

        assert_eq!(store.list("/acks/s1"), vec!["/acks/s1/r1".to_string()]);
        assert_eq!(store.list("/acks").len(), 2);
        assert_eq!(store.list("/acks/s1/r1"), vec!["/acks/s1/r1".to_string()]);
        assert!(store.list("/acks/s").is_empty());
    }

    #[test]
    fn concurrent_overwrites_bump_version_once_each() {
        let store = HashMapCoordinationStore::new();
        let threads = 8;
        let writes_per_thread = 50;

        std::thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| {
                    for _ in 0..writes_per_thread {
                        store.put("/acks/s/r", Vec::new()).unwrap();
                    }
                });
            }
        });

        let node = store.get("/acks/s/r").unwrap().unwrap();
        assert_eq!(node.metadata.version, threads * writes_per_thread);
    }

    #[test]
    fn clear_removes_everything() {
        let store = HashMapCoordinationStore::new();
        store.put("/a", Vec::new()).unwrap();
        store.put("/b", Vec::new()).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains_key("/a"));
    }
}
