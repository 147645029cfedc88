//! # Batch Renderer
//!
//! Turns the z-ordered sequence of renderables into the minimum number of
//! draw calls that still preserves correct GPU state, by accumulating
//! geometry into a shared buffer and flushing exactly when batching would
//! otherwise be invalid.
//!
//! ## Flush triggers
//!
//! - A texture slot rebind (only when a texture was previously bound)
//! - A shader variant change (also resets cached blend and camera state)
//! - A blend mode change
//! - A per-draw world matrix or per-draw uniforms (flush before *and* after:
//!   such a draw is never batched with anything)
//! - The accumulated buffer reaching the configured triangle limit

use crate::foundation::math::Mat3;
use crate::render::batch_buffer::BatchMeshBuffer;
use crate::render::device::{RenderDevice, RenderResult};
use crate::render::renderable::{
    BlendMode, Renderable, ShaderVariant, TextureHandle, TextureSlot,
};
use crate::render::stats::RenderStats;
use crate::scene::graph::SceneGraph;
use crate::scene::z_order::ZOrderIndex;
use crate::core::config::BatchRendererConfig;

/// GPU state mirrored by the renderer across one render pass
///
/// Tracks what is actually bound on the device so state changes (and their
/// flushes) happen only when required.
#[derive(Debug, Default)]
struct GpuState {
    texture0: Option<TextureHandle>,
    texture1: Option<TextureHandle>,
    shader: Option<ShaderVariant>,
    blend: Option<BlendMode>,
    camera_transform_bound: bool,
}

/// Batched mesh renderer
///
/// Walks the [`ZOrderIndex`] in paint order, feeding each node's renderable
/// through the flush rules above. Failures inside a single renderable's draw
/// are logged and skipped; the pass continues with the next renderable.
pub struct BatchRenderer {
    config: BatchRendererConfig,
    buffer: BatchMeshBuffer,
    state: GpuState,
    stats: RenderStats,
}

impl BatchRenderer {
    /// Create a batch renderer with the given configuration
    pub fn new(config: BatchRendererConfig) -> Self {
        Self {
            config,
            buffer: BatchMeshBuffer::new(),
            state: GpuState::default(),
            stats: RenderStats::new(),
        }
    }

    /// Render statistics for the most recent pass
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Reset the peak draw-call counter
    pub fn reset_peak_stats(&mut self) {
        self.stats.reset_peak();
    }

    /// Render every attached renderable in descending z order
    ///
    /// Requires a completed staging pass: world transforms and the z-order
    /// index must be consistent when this runs.
    pub fn render_pass(
        &mut self,
        scene: &mut SceneGraph,
        z_order: &ZOrderIndex,
        camera: &Mat3,
        device: &mut dyn RenderDevice,
    ) {
        self.begin_pass();

        for key in z_order.iter() {
            let Some(node) = scene.node_mut(key) else {
                continue;
            };
            let world_render = *node.world_render_matrix();
            let Some(renderable) = node.renderable_mut() else {
                continue;
            };
            if let Err(err) = Self::draw_one(
                &mut self.buffer,
                &mut self.state,
                &mut self.stats,
                &self.config,
                renderable,
                &world_render,
                camera,
                device,
            ) {
                log::error!("skipping renderable: {err}");
            }
        }

        self.end_pass(device);
    }

    /// Reset pass-local GPU state mirroring and per-frame statistics
    fn begin_pass(&mut self) {
        self.state = GpuState::default();
        self.buffer.clear();
        self.stats.begin_frame();
    }

    /// Flush remaining geometry and end the active shader program
    fn end_pass(&mut self, device: &mut dyn RenderDevice) {
        if let Err(err) = Self::flush(&mut self.buffer, &mut self.stats, &self.config, device) {
            log::error!("final flush failed: {err}");
        }
        if let Some(shader) = self.state.shader.take() {
            if let Err(err) = device.end_shader(shader) {
                log::error!("ending shader program failed: {err}");
            }
        }
    }

    /// Feed one renderable through the batching state machine
    ///
    /// Associated function rather than a method so the caller can hold a
    /// mutable borrow of the scene node that owns `renderable`.
    fn draw_one(
        buffer: &mut BatchMeshBuffer,
        state: &mut GpuState,
        stats: &mut RenderStats,
        config: &BatchRendererConfig,
        renderable: &mut dyn Renderable,
        world_render: &Mat3,
        camera: &Mat3,
        device: &mut dyn RenderDevice,
    ) -> RenderResult<()> {
        // 1. Texture slot 0: flush only if a texture was previously bound
        let texture0 = renderable.texture0();
        if texture0 != state.texture0 {
            if state.texture0.is_some() {
                Self::flush(buffer, stats, config, device)?;
            }
            if let Some(texture) = texture0 {
                device.bind_texture(TextureSlot::Slot0, texture)?;
            }
            state.texture0 = texture0;
        }

        // Texture slot 1, independently
        let texture1 = renderable.texture1();
        if texture1 != state.texture1 {
            if state.texture1.is_some() {
                Self::flush(buffer, stats, config, device)?;
            }
            if let Some(texture) = texture1 {
                device.bind_texture(TextureSlot::Slot1, texture)?;
            }
            state.texture1 = texture1;
        }

        // 2. Shader variant: dual-texture when both slots hold different
        //    textures. Switching programs invalidates blend and camera state.
        let variant = ShaderVariant {
            shader: renderable.shader(),
            dual_texture: matches!((texture0, texture1), (Some(a), Some(b)) if a != b),
        };
        if state.shader != Some(variant) {
            Self::flush(buffer, stats, config, device)?;
            if let Some(old) = state.shader.take() {
                device.end_shader(old)?;
            }
            device.begin_shader(variant)?;
            state.shader = Some(variant);
            state.blend = None;
            state.camera_transform_bound = false;
        }

        // 3. Blend mode
        let blend = renderable.blend_mode();
        if state.blend != Some(blend) {
            Self::flush(buffer, stats, config, device)?;
            device.apply_blend_mode(blend)?;
            state.blend = Some(blend);
        }

        // A draw with per-draw state is issued alone: flushed before (below)
        // and flushed again after its geometry is appended.
        let mut isolated = false;

        // 4. Transform uniform: shared camera matrix for pre-multiplied
        //    meshes, per-draw world matrix otherwise
        if renderable.premultiplied_world() {
            if !state.camera_transform_bound {
                device.set_transform_uniform(camera)?;
                state.camera_transform_bound = true;
            }
        } else {
            Self::flush(buffer, stats, config, device)?;
            device.set_transform_uniform(world_render)?;
            state.camera_transform_bound = false;
            isolated = true;
        }

        // 5. Default/custom per-draw uniforms
        if !renderable.uniform_flags().is_empty() {
            Self::flush(buffer, stats, config, device)?;
            renderable.apply_uniforms(device)?;
            isolated = true;
        }

        // 6. Capacity: flush if appending would exceed the batch limit. A
        //    mesh that can never fit any batch is issued (and dropped) alone.
        let mesh_triangles = renderable.mesh().triangle_count();
        if buffer.triangle_count() + mesh_triangles > config.max_batch_triangles {
            Self::flush(buffer, stats, config, device)?;
        }
        if mesh_triangles > config.max_batch_triangles {
            isolated = true;
        }

        // 7. Append with index remap
        buffer.append(renderable.mesh());

        // 8. A per-draw-state renderable never shares a draw call
        if isolated {
            Self::flush(buffer, stats, config, device)?;
        }

        Ok(())
    }

    /// Issue one draw call over the accumulated geometry
    ///
    /// No-op when empty. An over-limit buffer (a single oversized mesh) is
    /// logged and discarded instead of issuing a malformed draw.
    fn flush(
        buffer: &mut BatchMeshBuffer,
        stats: &mut RenderStats,
        config: &BatchRendererConfig,
        device: &mut dyn RenderDevice,
    ) -> RenderResult<()> {
        if buffer.is_empty() {
            return Ok(());
        }
        let triangles = buffer.triangle_count();
        if triangles > config.max_batch_triangles {
            log::error!(
                "discarding oversized batch: {triangles} triangles exceeds limit {}",
                config.max_batch_triangles
            );
            buffer.clear();
            return Ok(());
        }
        let result = device.draw_triangles(buffer.vertices(), buffer.indices());
        if result.is_ok() {
            stats.record_draw(triangles as u32);
        }
        buffer.clear();
        result
    }
}

impl Default for BatchRenderer {
    fn default() -> Self {
        Self::new(BatchRendererConfig::default())
    }
}
