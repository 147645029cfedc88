//! Transform node: the hierarchical placement unit of the scene forest
//!
//! A node owns its local placement fields and four cached matrices. Caches
//! are written only by the staging pass; gameplay and editor code mutate the
//! public local fields and the next staging pass picks the changes up through
//! shadow-state comparison.

use slotmap::new_key_type;

use crate::foundation::math::{translation, Mat3, Transform2D, Vec2};
use crate::render::renderable::Renderable;

new_key_type! {
    /// Stable handle to a node in the scene forest
    pub struct NodeKey;
}

/// A node in the transform hierarchy
///
/// Invariants:
/// - `world_matrix == parent world matrix * local_matrix` (identity parent
///   matrix at roots) outside an in-progress staging pass.
/// - The cached world z equals the z recorded for this node in the z-order
///   index outside an in-progress staging pass.
///
/// Parent/child links are maintained exclusively by
/// [`crate::scene::graph::SceneGraph`].
pub struct TransformNode {
    /// Local placement relative to the parent
    pub transform: Transform2D,

    /// Z offset added to the parent's world z
    pub z_offset: f32,

    /// Render origin, baked into the render matrices as a trailing
    /// translation so meshes draw relative to this point
    pub origin: Vec2,

    // Caches, written by the staging pass
    local_matrix: Mat3,
    local_render_matrix: Mat3,
    world_matrix: Mat3,
    world_render_matrix: Mat3,
    world_z: f32,

    // Shadow state used at the last recompute
    last_transform: Transform2D,
    last_z_offset: f32,
    last_origin: Vec2,
    last_parent: Option<NodeKey>,
    force_update: bool,

    // Hierarchy links, owned by SceneGraph
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    // Renderable payload; presence implies z-order membership
    pub(crate) renderable: Option<Box<dyn Renderable>>,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformNode {
    /// Create a detached identity node
    pub fn new() -> Self {
        Self {
            transform: Transform2D::identity(),
            z_offset: 0.0,
            origin: Vec2::zeros(),
            local_matrix: Mat3::identity(),
            local_render_matrix: Mat3::identity(),
            world_matrix: Mat3::identity(),
            world_render_matrix: Mat3::identity(),
            world_z: 0.0,
            last_transform: Transform2D::identity(),
            last_z_offset: 0.0,
            last_origin: Vec2::zeros(),
            last_parent: None,
            force_update: true,
            parent: None,
            children: Vec::new(),
            renderable: None,
        }
    }

    /// Parent node, if any
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Children in attachment order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Cached local matrix
    pub fn local_matrix(&self) -> &Mat3 {
        &self.local_matrix
    }

    /// Cached world matrix
    pub fn world_matrix(&self) -> &Mat3 {
        &self.world_matrix
    }

    /// Cached world matrix with the render origin baked in
    pub fn world_render_matrix(&self) -> &Mat3 {
        &self.world_render_matrix
    }

    /// Cached world z (parent world z plus this node's offset)
    pub fn world_z(&self) -> f32 {
        self.world_z
    }

    /// Attached renderable payload
    pub fn renderable(&self) -> Option<&dyn Renderable> {
        self.renderable.as_deref()
    }

    /// Attached renderable payload, mutable
    pub fn renderable_mut(&mut self) -> Option<&mut (dyn Renderable + 'static)> {
        self.renderable.as_deref_mut()
    }

    /// Force a recompute on the next staging pass
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }

    /// Whether the local matrices must be recomputed this pass
    ///
    /// True when any local field changed since the last recompute, when the
    /// parent identity changed, or when the parent's world changed this pass
    /// and this node carries rotation or shear. Translation/scale-only
    /// children skip the local recompute on a pure parent change because the
    /// local matrix does not encode the parent's contribution.
    pub(crate) fn needs_local_recompute(&self, parent_world_changed: bool) -> bool {
        self.force_update
            || self.transform != self.last_transform
            || self.z_offset != self.last_z_offset
            || self.origin != self.last_origin
            || self.parent != self.last_parent
            || (self.parent.is_some()
                && parent_world_changed
                && self.transform.has_rotation_or_shear())
    }

    /// Recompute the local matrices and sync the shadow state
    pub(crate) fn recompute_local(&mut self) {
        self.local_matrix = self.transform.to_matrix();
        self.local_render_matrix = self.local_matrix * translation(-self.origin);

        self.last_transform = self.transform;
        self.last_z_offset = self.z_offset;
        self.last_origin = self.origin;
        self.last_parent = self.parent;
        self.force_update = false;
    }

    /// Recompose the world caches from the parent's world state
    ///
    /// Returns the new world z (the caller updates the z-order index when it
    /// differs from the previous cache).
    pub(crate) fn recompute_world(&mut self, parent_world: &Mat3, parent_world_z: f32) -> f32 {
        self.world_matrix = parent_world * self.local_matrix;
        self.world_render_matrix = parent_world * self.local_render_matrix;
        parent_world_z + self.z_offset
    }

    /// Overwrite the cached world z after the z-order index was updated
    pub(crate) fn set_world_z(&mut self, world_z: f32) {
        self.world_z = world_z;
    }
}

impl std::fmt::Debug for TransformNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformNode")
            .field("transform", &self.transform)
            .field("z_offset", &self.z_offset)
            .field("origin", &self.origin)
            .field("world_z", &self.world_z)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("has_renderable", &self.renderable.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_new_node_is_dirty() {
        let node = TransformNode::new();
        assert!(node.needs_local_recompute(false));
    }

    #[test]
    fn test_recompute_clears_dirty() {
        let mut node = TransformNode::new();
        node.recompute_local();
        assert!(!node.needs_local_recompute(false));
    }

    #[test]
    fn test_field_edit_marks_dirty() {
        let mut node = TransformNode::new();
        node.recompute_local();
        node.transform.position = Vec2::new(4.0, 0.0);
        assert!(node.needs_local_recompute(false));
    }

    #[test]
    fn test_z_offset_edit_marks_dirty() {
        let mut node = TransformNode::new();
        node.recompute_local();
        node.z_offset = 2.5;
        assert!(node.needs_local_recompute(false));
    }

    #[test]
    fn test_parent_change_alone_skips_translation_only_child() {
        // A clean translation/scale-only child does not recompute its local
        // matrix when only the parent's world changed.
        let mut node = TransformNode::new();
        node.parent = Some(NodeKey::default());
        node.transform.position = Vec2::new(1.0, 2.0);
        node.recompute_local();
        assert!(!node.needs_local_recompute(true));
    }

    #[test]
    fn test_parent_change_recomputes_rotated_child() {
        let mut node = TransformNode::new();
        node.parent = Some(NodeKey::default());
        node.transform.rotation = 45.0;
        node.recompute_local();
        assert!(node.needs_local_recompute(true));
    }

    #[test]
    fn test_parent_identity_change_marks_dirty() {
        let mut node = TransformNode::new();
        node.recompute_local();
        node.parent = Some(NodeKey::default());
        assert!(node.needs_local_recompute(false));
    }

    #[test]
    fn test_origin_baked_into_render_matrix_only() {
        let mut node = TransformNode::new();
        node.origin = Vec2::new(0.5, 0.5);
        node.recompute_local();

        assert_relative_eq!(*node.local_matrix(), Mat3::identity(), epsilon = EPSILON);
        let expected = translation(Vec2::new(-0.5, -0.5));
        assert_relative_eq!(node.local_render_matrix, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_world_z_accumulates_parent_z() {
        let mut node = TransformNode::new();
        node.z_offset = 1.5;
        node.recompute_local();
        let z = node.recompute_world(&Mat3::identity(), 2.0);
        assert_eq!(z, 3.5);
    }
}
