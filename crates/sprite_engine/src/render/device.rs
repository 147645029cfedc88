//! Render device abstraction
//!
//! The narrow boundary between the batch renderer and a concrete GPU API.
//! The engine core never talks to a graphics library directly; production
//! code supplies a device backed by the platform renderer, tests supply
//! recording fakes.

use thiserror::Error;

use crate::foundation::math::Mat3;
use crate::render::mesh::Vertex2D;
use crate::render::renderable::{BlendMode, ShaderVariant, TextureHandle, TextureSlot};

/// Result type for device operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors surfaced by a render device
#[derive(Debug, Error)]
pub enum RenderError {
    /// The device rejected or failed a state change or draw
    #[error("Device error: {0}")]
    Device(String),

    /// A requested resource handle is unknown to the device
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

/// GPU boundary consumed by the batch renderer
///
/// Implementations are stateful in the same way a GL/Vulkan context is:
/// bound textures, the active program, and blend state persist until changed.
/// The batch renderer mirrors that state and calls these methods only when a
/// change is actually required.
pub trait RenderDevice {
    /// Bind a texture to a slot
    fn bind_texture(&mut self, slot: TextureSlot, texture: TextureHandle) -> RenderResult<()>;

    /// Begin a shader program
    fn begin_shader(&mut self, shader: ShaderVariant) -> RenderResult<()>;

    /// End the active shader program
    fn end_shader(&mut self, shader: ShaderVariant) -> RenderResult<()>;

    /// Apply a blend mode
    fn apply_blend_mode(&mut self, blend: BlendMode) -> RenderResult<()>;

    /// Upload the transform uniform of the active shader
    ///
    /// Receives either the shared camera matrix or a single node's world
    /// matrix; the renderer decides which per draw.
    fn set_transform_uniform(&mut self, matrix: &Mat3) -> RenderResult<()>;

    /// Issue one indexed triangle draw over the given buffers
    fn draw_triangles(&mut self, vertices: &[Vertex2D], indices: &[u32]) -> RenderResult<()>;
}

/// Device that accepts and discards everything
///
/// Useful for headless runs and for tests that only observe engine-side
/// state (statistics, staging results).
#[derive(Debug, Default)]
pub struct NullDevice;

impl NullDevice {
    /// Create a new null device
    pub fn new() -> Self {
        Self
    }
}

impl RenderDevice for NullDevice {
    fn bind_texture(&mut self, _slot: TextureSlot, _texture: TextureHandle) -> RenderResult<()> {
        Ok(())
    }

    fn begin_shader(&mut self, _shader: ShaderVariant) -> RenderResult<()> {
        Ok(())
    }

    fn end_shader(&mut self, _shader: ShaderVariant) -> RenderResult<()> {
        Ok(())
    }

    fn apply_blend_mode(&mut self, _blend: BlendMode) -> RenderResult<()> {
        Ok(())
    }

    fn set_transform_uniform(&mut self, _matrix: &Mat3) -> RenderResult<()> {
        Ok(())
    }

    fn draw_triangles(&mut self, _vertices: &[Vertex2D], _indices: &[u32]) -> RenderResult<()> {
        Ok(())
    }
}
