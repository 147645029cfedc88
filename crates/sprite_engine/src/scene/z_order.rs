//! Z-ordered paint sequence
//!
//! A flat list of renderable nodes, descending by cached world z. At engine
//! scale a flat ordered list beats tree structures: z changes per frame are a
//! small fraction of total nodes, so the O(n) reinsertion scan is the
//! deliberate simplicity/performance trade-off, not an oversight.

use std::collections::HashSet;

use crate::scene::node::NodeKey;

#[derive(Debug, Clone, Copy)]
struct ZEntry {
    key: NodeKey,
    z: f32,
}

/// Ordered sequence of renderable nodes, descending by world z
///
/// Order is a valid descending sort at the start and end of every frame; it
/// is permitted to be transiently inconsistent only while a staging pass is
/// updating it.
#[derive(Debug, Default)]
pub struct ZOrderIndex {
    entries: Vec<ZEntry>,
}

impl ZOrderIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a node is present
    pub fn contains(&self, key: NodeKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Keys in paint order (highest z first)
    pub fn iter(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Insert a node at its z position
    ///
    /// Scans from the head and inserts before the first entry with a
    /// strictly lesser z, so equal-z nodes keep their insertion order.
    pub fn insert(&mut self, key: NodeKey, z: f32) {
        debug_assert!(!self.contains(key), "node inserted twice into z-order");
        let position = self
            .entries
            .iter()
            .position(|e| e.z < z)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, ZEntry { key, z });
    }

    /// Remove a node by identity
    pub fn remove(&mut self, key: NodeKey) {
        self.entries.retain(|e| e.key != key);
    }

    /// Move a node to the position of its new z
    pub fn update(&mut self, key: NodeKey, z: f32) {
        self.remove(key);
        self.insert(key, z);
    }

    /// Remove every node in `keys` in a single pass
    ///
    /// Used by the hard-destroy drain, which batches its reference scrubbing
    /// instead of paying one scan per destroyed node.
    pub fn scrub(&mut self, keys: &HashSet<NodeKey>) {
        self.entries.retain(|e| !keys.contains(&e.key));
    }

    /// Whether adjacent entries are in descending z order
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].z >= w[1].z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<NodeKey> {
        let mut map: SlotMap<NodeKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_insert_keeps_descending_order() {
        let k = keys(4);
        let mut index = ZOrderIndex::new();
        index.insert(k[0], 1.0);
        index.insert(k[1], 5.0);
        index.insert(k[2], 3.0);
        index.insert(k[3], -2.0);

        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec![k[1], k[2], k[0], k[3]]);
        assert!(index.is_sorted());
    }

    #[test]
    fn test_equal_z_is_stable() {
        let k = keys(3);
        let mut index = ZOrderIndex::new();
        index.insert(k[0], 1.0);
        index.insert(k[1], 1.0);
        index.insert(k[2], 1.0);

        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec![k[0], k[1], k[2]]);
    }

    #[test]
    fn test_update_moves_by_identity() {
        let k = keys(3);
        let mut index = ZOrderIndex::new();
        index.insert(k[0], 3.0);
        index.insert(k[1], 2.0);
        index.insert(k[2], 1.0);

        index.update(k[2], 10.0);
        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec![k[2], k[0], k[1]]);
        assert!(index.is_sorted());
    }

    #[test]
    fn test_update_to_equal_z_goes_after_existing() {
        let k = keys(2);
        let mut index = ZOrderIndex::new();
        index.insert(k[0], 2.0);
        index.insert(k[1], 1.0);

        index.update(k[1], 2.0);
        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec![k[0], k[1]]);
    }

    #[test]
    fn test_scrub_removes_batch() {
        let k = keys(4);
        let mut index = ZOrderIndex::new();
        for (i, &key) in k.iter().enumerate() {
            index.insert(key, i as f32);
        }

        let doomed: HashSet<_> = [k[1], k[3]].into_iter().collect();
        index.scrub(&doomed);

        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec![k[2], k[0]]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let k = keys(2);
        let mut index = ZOrderIndex::new();
        index.insert(k[0], 1.0);
        index.remove(k[1]);
        assert_eq!(index.len(), 1);
    }
}
