//! Shared geometry accumulation buffer for the batch renderer

use crate::render::mesh::{Mesh, Vertex2D};

/// Growable vertex/index arrays shared by all draws in a batch
///
/// Appended meshes have their indices remapped by the current vertex offset
/// so the whole buffer can be issued as one draw call. The buffer is cleared
/// on every flush; capacity is retained across frames to avoid per-frame
/// allocation.
#[derive(Debug, Default)]
pub struct BatchMeshBuffer {
    vertices: Vec<Vertex2D>,
    indices: Vec<u32>,
}

impl BatchMeshBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mesh, remapping its indices by the current vertex offset
    pub fn append(&mut self, mesh: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&mesh.vertices);
        self.indices.extend(mesh.indices.iter().map(|i| i + base));
    }

    /// Accumulated vertices
    pub fn vertices(&self) -> &[Vertex2D] {
        &self.vertices
    }

    /// Accumulated indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of accumulated triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Discard accumulated geometry, keeping capacity
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}
