//! Staging pass: the bridge between update and render
//!
//! After the update phase has mutated local fields and queued structural
//! changes, staging brings every cached world transform and the z-order
//! index back to a consistent state before rendering:
//!
//! 1. Drain soft destroys, then scene unloads, then the batched hard-destroy
//!    reference scrub. This exact order is load-bearing: the scrub must
//!    never run while scenes or components are mid-destruction.
//! 2. Walk each scene top-down, recomputing only what the dirty rules say
//!    changed, propagating "world changed" to children, and reinserting
//!    nodes whose world z moved.
//!
//! An unmodified subtree costs a few field comparisons per node per frame; a
//! single edit near a root costs a repropagation bounded by its subtree
//! size.

use std::collections::HashSet;

use crate::foundation::math::Mat3;
use crate::scene::destruction::DestructionQueue;
use crate::scene::graph::SceneGraph;
use crate::scene::node::NodeKey;
use crate::scene::z_order::ZOrderIndex;

/// Counters for one staging run
///
/// Reset at the start of every run. The dirty rules are observable here:
/// staging an unchanged scene reports zero recomputes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StagingStats {
    /// Nodes walked this run
    pub nodes_visited: usize,

    /// Local matrix recomputations
    pub local_recomputes: usize,

    /// World matrix recompositions
    pub world_recomputes: usize,

    /// Z-order reinsertions
    pub z_reinserts: usize,

    /// Nodes freed by the destruction drain
    pub nodes_destroyed: usize,
}

/// One pending node visit during the top-down walk
///
/// Carries the parent's world state by value so the walk needs only one node
/// borrow at a time. The "world changed this pass" flag travels on these
/// frames and dies with the walk, which is the pass-scoped lifetime the flag
/// is defined to have.
#[derive(Debug, Clone, Copy)]
struct StackFrame {
    key: NodeKey,
    parent_world: Mat3,
    parent_world_z: f32,
    parent_world_changed: bool,
}

/// The staging pass
///
/// Owns its traversal scratch buffers so repeated runs do not allocate.
#[derive(Debug, Default)]
pub struct StagingPass {
    stack: Vec<StackFrame>,
    scratch_keys: Vec<NodeKey>,
    stats: StagingStats,
}

impl StagingPass {
    /// Create a staging pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for the most recent run
    pub fn stats(&self) -> &StagingStats {
        &self.stats
    }

    /// Run the pass: drain destruction, then restore transform/z consistency
    ///
    /// Errors here are not isolated per node: a partial staging would leave
    /// the caches inconsistent for the rest of the frame, so contract
    /// violations propagate as panics.
    pub fn run(
        &mut self,
        scene: &mut SceneGraph,
        z_order: &mut ZOrderIndex,
        destruction: &mut DestructionQueue,
    ) {
        self.stats = StagingStats::default();
        self.drain_destruction(scene, z_order, destruction);
        self.stage_transforms(scene, z_order);
    }

    /// Apply deferred structural mutations in the one safe order
    fn drain_destruction(
        &mut self,
        scene: &mut SceneGraph,
        z_order: &mut ZOrderIndex,
        destruction: &mut DestructionQueue,
    ) {
        // Soft destroys: unlink from the hierarchy, then hand the subtree to
        // the hard batch below.
        for key in destruction.take_soft() {
            if !scene.contains(key) {
                continue;
            }
            scene.unlink(key);
            destruction.queue_hard_destroy(key);
        }

        // Scene unloads: must reference roots (or nodes already unlinked by
        // a soft destroy this frame).
        for root in destruction.take_unload() {
            if !scene.contains(root) {
                continue;
            }
            assert!(
                scene.node(root).is_some_and(|n| n.parent().is_none()),
                "unload target is not a scene root"
            );
            scene.unlink(root);
            destruction.queue_hard_destroy(root);
        }

        // Hard destroys: expand to whole subtrees and scrub every global
        // reference in a single pass, then free the nodes.
        self.scratch_keys.clear();
        for key in destruction.take_hard() {
            if scene.contains(key) {
                scene.collect_subtree(key, &mut self.scratch_keys);
            }
        }
        if !self.scratch_keys.is_empty() {
            let doomed: HashSet<NodeKey> = self.scratch_keys.iter().copied().collect();
            z_order.scrub(&doomed);
            scene.free_nodes(&self.scratch_keys);
            self.stats.nodes_destroyed = doomed.len();
            log::debug!("destruction drained {} nodes", doomed.len());
        }
    }

    /// Top-down dirty-driven recompute from every scene root
    fn stage_transforms(&mut self, scene: &mut SceneGraph, z_order: &mut ZOrderIndex) {
        self.stack.clear();
        for &root in scene.roots() {
            self.stack.push(StackFrame {
                key: root,
                parent_world: Mat3::identity(),
                parent_world_z: 0.0,
                parent_world_changed: false,
            });
        }

        while let Some(frame) = self.stack.pop() {
            let Some(node) = scene.node_mut(frame.key) else {
                continue;
            };
            self.stats.nodes_visited += 1;

            let local_recomputed = if node.needs_local_recompute(frame.parent_world_changed) {
                node.recompute_local();
                self.stats.local_recomputes += 1;
                true
            } else {
                false
            };

            let world_changed = local_recomputed || frame.parent_world_changed;
            if world_changed {
                let new_z = node.recompute_world(&frame.parent_world, frame.parent_world_z);
                self.stats.world_recomputes += 1;

                if new_z != node.world_z() {
                    if node.renderable().is_some() {
                        z_order.update(frame.key, new_z);
                        self.stats.z_reinserts += 1;
                    }
                    node.set_world_z(new_z);
                }

                let world_render = *node.world_render_matrix();
                if let Some(renderable) = node.renderable_mut() {
                    renderable.world_transform_changed(&world_render);
                }
            }

            let parent_world = *node.world_matrix();
            let parent_world_z = node.world_z();
            for &child in node.children() {
                self.stack.push(StackFrame {
                    key: child,
                    parent_world,
                    parent_world_z,
                    parent_world_changed: world_changed,
                });
            }
        }
    }
}
