//! Mesh data for the 2D batch renderer

use bytemuck::{Pod, Zeroable};

/// A single 2D vertex
///
/// Position is either local space or pre-multiplied world space, depending
/// on the owning renderable's [`crate::render::Renderable::premultiplied_world`]
/// flag.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex2D {
    /// Vertex position (x, y)
    pub position: [f32; 2],

    /// Texture coordinates (u, v)
    pub uv: [f32; 2],

    /// Vertex color (RGBA, linear)
    pub color: [f32; 4],
}

impl Vertex2D {
    /// Create a white vertex at a position with the given texture coordinates
    pub fn new(position: [f32; 2], uv: [f32; 2]) -> Self {
        Self {
            position,
            uv,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex buffer
    pub vertices: Vec<Vertex2D>,

    /// Index buffer; every three indices form one triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertex and index buffers
    pub fn from_buffers(vertices: Vec<Vertex2D>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(indices.len() % 3, 0, "index count must be a multiple of 3");
        Self { vertices, indices }
    }

    /// Axis-aligned unit quad `[0,1]x[0,1]` made of two triangles
    pub fn unit_quad() -> Self {
        Self {
            vertices: vec![
                Vertex2D::new([0.0, 0.0], [0.0, 0.0]),
                Vertex2D::new([1.0, 0.0], [1.0, 0.0]),
                Vertex2D::new([1.0, 1.0], [1.0, 1.0]),
                Vertex2D::new([0.0, 1.0], [0.0, 1.0]),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
