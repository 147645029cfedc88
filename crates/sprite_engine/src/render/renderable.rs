//! Renderable payload trait and the GPU state selectors it exposes
//!
//! A [`Renderable`] is supplied by the scene/component layer and attached to
//! a transform node. The batch renderer queries it for mesh data and the GPU
//! state it requires (shader, blend mode, textures, uniforms); the answers
//! drive the flush decisions in
//! [`crate::render::BatchRenderer`].

use bitflags::bitflags;

use crate::foundation::math::Mat3;
use crate::render::device::{RenderDevice, RenderResult};
use crate::render::mesh::Mesh;

/// Handle to a shader program registered with the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Concrete shader program variant resolved for a draw
///
/// A shader id may have single- and dual-texture variants; the dual variant
/// is selected when both texture slots are populated with different textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderVariant {
    /// Base shader program
    pub shader: ShaderId,

    /// Whether the two-texture variant is required
    pub dual_texture: bool,
}

/// Handle to a texture resource stored in the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Texture binding slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// Primary texture unit
    Slot0,
    /// Secondary texture unit
    Slot1,
}

/// Blend mode applied when rasterizing a renderable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard alpha blending
    Normal,
    /// Additive blending
    Additive,
    /// Multiplicative blending
    Multiply,
    /// Screen blending
    Screen,
}

bitflags! {
    /// Per-draw uniform requirements declared by a renderable
    ///
    /// Either flag makes the draw un-batchable: per-draw uniforms are never
    /// shared across a batched draw call, so the renderer flushes before and
    /// after applying them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UniformFlags: u8 {
        /// The renderable resets shader uniforms to their defaults
        const DEFAULT = 1 << 0;
        /// The renderable uploads custom uniform values
        const CUSTOM = 1 << 1;
    }
}

/// Renderable payload attached to a transform node
///
/// Implemented by the component layer. Mesh data may be generated lazily on
/// first access; the staging pass notifies the payload through
/// [`Renderable::world_transform_changed`] whenever the owning node's world
/// transform is recomputed, so pre-multiplied meshes can re-bake.
pub trait Renderable {
    /// Mesh vertex/index data for this draw (may be generated on demand)
    fn mesh(&mut self) -> &Mesh;

    /// Shader program to draw with
    fn shader(&self) -> ShaderId;

    /// Blend mode to draw with
    fn blend_mode(&self) -> BlendMode;

    /// Whether mesh vertices are already baked into world space
    ///
    /// When `true`, the shared camera transform uniform is used and the draw
    /// can batch with its neighbors. When `false`, the node's world matrix is
    /// uploaded as a per-draw uniform and the draw is issued alone.
    fn premultiplied_world(&self) -> bool;

    /// Texture bound to slot 0, if any
    fn texture0(&self) -> Option<TextureHandle> {
        None
    }

    /// Texture bound to slot 1, if any
    fn texture1(&self) -> Option<TextureHandle> {
        None
    }

    /// Per-draw uniform requirements
    fn uniform_flags(&self) -> UniformFlags {
        UniformFlags::empty()
    }

    /// Upload the per-draw uniforms declared by [`Renderable::uniform_flags`]
    fn apply_uniforms(&mut self, device: &mut dyn RenderDevice) -> RenderResult<()> {
        let _ = device;
        Ok(())
    }

    /// Notification that the owning node's world-render matrix changed
    ///
    /// Invoked by the staging pass after a world recompute, before the render
    /// pass walks the draw order.
    fn world_transform_changed(&mut self, world_render: &Mat3) {
        let _ = world_render;
    }
}
