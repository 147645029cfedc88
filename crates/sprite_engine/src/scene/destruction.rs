//! Deferred destruction queue
//!
//! Structural mutations raised during the update phase are queued here and
//! applied by the staging pass, so in-progress iteration never observes a
//! half-destroyed hierarchy. Entries are consumed exactly once per frame, in
//! the one safe order: soft destroys, then scene unloads, then the batched
//! hard-destroy reference scrub. Draining out of order is a caller contract
//! violation and halts loudly.

use crate::scene::node::NodeKey;

/// Which drain step the current frame has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainStage {
    /// No drain in progress; queues accept new entries
    Pending,
    /// Soft destroys taken
    SoftTaken,
    /// Unloads taken
    UnloadTaken,
}

/// Three ordered deferred-action lists consumed once per frame
///
/// - **Soft destroy**: nodes scheduled for removal this frame, not yet
///   unlinked from the hierarchy.
/// - **Unload**: scene roots pending wholesale removal.
/// - **Hard destroy**: nodes whose global references must be scrubbed.
///   Processed as one batch at the end of the drain; per-item immediate
///   scrubbing would cost a full reference scan per node.
#[derive(Debug, Default)]
pub struct DestructionQueue {
    soft: Vec<NodeKey>,
    unload: Vec<NodeKey>,
    hard: Vec<NodeKey>,
    stage: Option<DrainStage>,
}

impl DestructionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            soft: Vec::new(),
            unload: Vec::new(),
            hard: Vec::new(),
            stage: None,
        }
    }

    /// Schedule a node (and its subtree) for destruction this frame
    pub fn queue_soft_destroy(&mut self, key: NodeKey) {
        self.soft.push(key);
    }

    /// Schedule a scene root for wholesale removal this frame
    pub fn queue_unload(&mut self, root: NodeKey) {
        self.unload.push(root);
    }

    /// Schedule a node for the hard-destroy reference scrub
    pub fn queue_hard_destroy(&mut self, key: NodeKey) {
        self.hard.push(key);
    }

    /// Whether anything is pending
    pub fn is_empty(&self) -> bool {
        self.soft.is_empty() && self.unload.is_empty() && self.hard.is_empty()
    }

    /// Take the soft-destroy entries; first drain step of a frame
    ///
    /// # Panics
    ///
    /// Panics if a drain is already in progress.
    pub(crate) fn take_soft(&mut self) -> Vec<NodeKey> {
        assert!(
            self.stage.is_none(),
            "destruction drained out of order: soft destroys must be taken first"
        );
        self.stage = Some(DrainStage::SoftTaken);
        std::mem::take(&mut self.soft)
    }

    /// Take the unload entries; second drain step
    ///
    /// # Panics
    ///
    /// Panics unless soft destroys were taken immediately before.
    pub(crate) fn take_unload(&mut self) -> Vec<NodeKey> {
        assert_eq!(
            self.stage,
            Some(DrainStage::SoftTaken),
            "destruction drained out of order: unloads must follow soft destroys"
        );
        self.stage = Some(DrainStage::UnloadTaken);
        std::mem::take(&mut self.unload)
    }

    /// Take the hard-destroy entries; final drain step
    ///
    /// Completes the frame's drain; the queue accepts new entries afterwards.
    ///
    /// # Panics
    ///
    /// Panics unless unloads were taken immediately before.
    pub(crate) fn take_hard(&mut self) -> Vec<NodeKey> {
        assert_eq!(
            self.stage,
            Some(DrainStage::UnloadTaken),
            "destruction drained out of order: hard destroys must be taken last"
        );
        self.stage = None;
        std::mem::take(&mut self.hard)
    }
}
