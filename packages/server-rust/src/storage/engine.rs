//! Coordination store trait.
//!
//! Defines [`CoordinationStore`], the path-keyed node store that
//! acknowledgments are written to. Paths are `/`-separated strings; the store
//! does not interpret them beyond listing the nodes below a path.

use super::record::Node;

/// Durable, path-keyed store shared between the engine and its clients.
///
/// Clients poll the node written for their `(session, request)` pair to learn
/// the outcome of a control message. All operations are synchronous.
///
/// Wrapped in `Arc<dyn CoordinationStore>` for sharing across processors.
pub trait CoordinationStore: Send + Sync + 'static {
    /// Create or overwrite the node at `path`. Returns the previous node if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn put(&self, path: &str, data: Vec<u8>) -> anyhow::Result<Option<Node>>;

    /// Retrieve the node at `path`, or `None` if not present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, path: &str) -> anyhow::Result<Option<Node>>;

    /// Remove the node at `path`, returning it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the removal.
    fn remove(&self, path: &str) -> anyhow::Result<Option<Node>>;

    /// Check if a node exists without returning it.
    fn contains_key(&self, path: &str) -> bool;

    /// Paths of the node at `prefix` and of every node below it, sorted.
    ///
    /// `prefix` is matched by whole path levels: `/acks/s1` does not list
    /// `/acks/s10`. A trailing `/` is ignored.
    fn list(&self, prefix: &str) -> Vec<String>;

    /// Return the number of nodes.
    fn len(&self) -> usize;

    /// Check if the store is empty.
    fn is_empty(&self) -> bool;

    /// Remove every node. Takes `&self` for `Arc<dyn CoordinationStore>` compatibility.
    fn clear(&self);
}

/// Marker for an empty segment. Escaped segments never equal it because
/// every literal `%` is written as `%25`.
const EMPTY_SEGMENT: &str = "%";

/// Appends `segments` to `root`, one path level each.
///
/// Segments are escaped so that distinct segment lists always produce
/// distinct paths: `%` and `/` are percent-encoded and an empty segment is
/// written as a lone `%`.
#[must_use]
pub fn join_path(root: &str, segments: &[&str]) -> String {
    let mut path = String::from(root.trim_end_matches('/'));
    for segment in segments {
        path.push('/');
        if segment.is_empty() {
            path.push_str(EMPTY_SEGMENT);
            continue;
        }
        for c in segment.chars() {
            match c {
                '%' => path.push_str("%25"),
                '/' => path.push_str("%2F"),
                other => path.push(other),
            }
        }
    }
    path
}
