//! Batched 2D mesh rendering
//!
//! The render pass walks the z-order index and feeds each node's renderable
//! into the [`BatchRenderer`], which coalesces draw calls while preserving
//! correct GPU state ordering. The GPU itself sits behind the
//! [`RenderDevice`] trait.

pub mod batch_buffer;
pub mod batch_renderer;
pub mod device;
pub mod mesh;
pub mod renderable;
pub mod stats;

pub use batch_buffer::BatchMeshBuffer;
pub use batch_renderer::BatchRenderer;
pub use device::{NullDevice, RenderDevice, RenderError, RenderResult};
pub use mesh::{Mesh, Vertex2D};
pub use renderable::{
    BlendMode, Renderable, ShaderId, ShaderVariant, TextureHandle, TextureSlot, UniformFlags,
};
pub use stats::RenderStats;
