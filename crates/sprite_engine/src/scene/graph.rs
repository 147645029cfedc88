//! Scene forest container
//!
//! Owns every [`TransformNode`] and the root list. All hierarchy mutations
//! go through this type so parent/child links and z-order membership stay
//! consistent. Structural removal during iteration is deferred through the
//! destruction queue; the graph itself only exposes the primitive operations
//! the staging pass applies.

use slotmap::SlotMap;

use crate::render::renderable::Renderable;
use crate::scene::node::{NodeKey, TransformNode};
use crate::scene::z_order::ZOrderIndex;

/// Forest of transform nodes
///
/// Each root is a scene: unloading a scene removes the whole subtree.
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, TransformNode>,
    roots: Vec<NodeKey>,
}

impl SceneGraph {
    /// Create an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Scene roots in creation order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Whether a key refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Borrow a node
    pub fn node(&self, key: NodeKey) -> Option<&TransformNode> {
        self.nodes.get(key)
    }

    /// Borrow a node mutably
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut TransformNode> {
        self.nodes.get_mut(key)
    }

    /// Create a new scene root
    pub fn spawn_root(&mut self) -> NodeKey {
        let key = self.nodes.insert(TransformNode::new());
        self.roots.push(key);
        key
    }

    /// Create a node attached under `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live node; attaching under a destroyed
    /// node is a caller contract violation.
    pub fn spawn_child(&mut self, parent: NodeKey) -> NodeKey {
        assert!(
            self.nodes.contains_key(parent),
            "spawn_child: parent node is not alive"
        );
        let key = self.nodes.insert(TransformNode::new());
        self.nodes[key].parent = Some(parent);
        self.nodes[parent].children.push(key);
        key
    }

    /// Move a node under a new parent (or to the root list)
    ///
    /// The node's local fields are untouched; the staging pass notices the
    /// parent identity change and recomputes caches.
    ///
    /// # Panics
    ///
    /// Panics if either key is dead, or if the move would create a cycle.
    pub fn set_parent(&mut self, key: NodeKey, new_parent: Option<NodeKey>) {
        assert!(self.nodes.contains_key(key), "set_parent: node is not alive");
        if let Some(parent) = new_parent {
            assert!(
                self.nodes.contains_key(parent),
                "set_parent: parent node is not alive"
            );
            assert!(
                !self.is_ancestor_of(key, parent),
                "set_parent: move would create a cycle"
            );
        }

        self.unlink(key);
        self.nodes[key].parent = new_parent;
        match new_parent {
            Some(parent) => self.nodes[parent].children.push(key),
            None => self.roots.push(key),
        }
    }

    /// Attach a renderable payload and register the node in the z-order
    pub fn set_renderable(
        &mut self,
        key: NodeKey,
        renderable: Box<dyn Renderable>,
        z_order: &mut ZOrderIndex,
    ) {
        let node = &mut self.nodes[key];
        let world_z = node.world_z();
        if node.renderable.replace(renderable).is_none() {
            z_order.insert(key, world_z);
        }
    }

    /// Detach the renderable payload and deregister from the z-order
    pub fn clear_renderable(
        &mut self,
        key: NodeKey,
        z_order: &mut ZOrderIndex,
    ) -> Option<Box<dyn Renderable>> {
        let taken = self.nodes.get_mut(key)?.renderable.take();
        if taken.is_some() {
            z_order.remove(key);
        }
        taken
    }

    /// Whether `ancestor` is `key` itself or one of its ancestors
    pub fn is_ancestor_of(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current).and_then(TransformNode::parent);
        }
        false
    }

    /// Collect `key` and all its descendants, depth-first, into `out`
    pub fn collect_subtree(&self, key: NodeKey, out: &mut Vec<NodeKey>) {
        let start = out.len();
        out.push(key);
        let mut cursor = start;
        while cursor < out.len() {
            if let Some(node) = self.nodes.get(out[cursor]) {
                out.extend_from_slice(&node.children);
            }
            cursor += 1;
        }
    }

    /// Detach a node from its parent's child list (or the root list)
    ///
    /// The node itself stays alive; callers re-link or free it.
    pub(crate) fn unlink(&mut self, key: NodeKey) {
        match self.nodes[key].parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|&c| c != key);
                }
            }
            None => self.roots.retain(|&r| r != key),
        }
        self.nodes[key].parent = None;
    }

    /// Free a set of nodes without touching links
    ///
    /// Used by the hard-destroy drain after every reference has been
    /// scrubbed; the keys must form whole unlinked subtrees.
    pub(crate) fn free_nodes(&mut self, keys: &[NodeKey]) {
        for &key in keys {
            self.nodes.remove(key);
        }
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .finish()
    }
}
