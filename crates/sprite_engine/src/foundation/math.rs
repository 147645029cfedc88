//! Math utilities and types
//!
//! Provides the fundamental 2D math types for the engine core. World and
//! local placements are homogeneous 2D affine transforms (3x3 matrices).

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type (homogeneous 2D affine transform)
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Build a homogeneous translation matrix
pub fn translation(offset: Vec2) -> Mat3 {
    Mat3::new_translation(&offset)
}

/// Build a homogeneous rotation matrix from an angle in degrees
pub fn rotation_degrees(degrees: f32) -> Mat3 {
    Mat3::new_rotation(degrees.to_radians())
}

/// Build a homogeneous non-uniform scaling matrix
pub fn scaling(factors: Vec2) -> Mat3 {
    Mat3::new_nonuniform_scaling(&factors)
}

/// Build a homogeneous shear matrix
///
/// `shear.x` displaces x proportionally to y, `shear.y` displaces y
/// proportionally to x.
pub fn shearing(shear: Vec2) -> Mat3 {
    Mat3::new(
        1.0, shear.x, 0.0,
        shear.y, 1.0, 0.0,
        0.0, 0.0, 1.0,
    )
}

/// Local placement of a node: position, rotation, shear, and scale
///
/// Rotation is stored in degrees. The matrix composition order is
/// translation, then rotation, then shear, then scale; scale is therefore
/// applied to mesh vertices first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Position relative to the parent
    pub position: Vec2,

    /// Rotation in degrees, counter-clockwise
    pub rotation: f32,

    /// Shear factors (x by y, y by x)
    pub shear: Vec2,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            shear: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only a position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Whether rotation or shear is present
    ///
    /// Translation/scale-only transforms commute with parent recomposition,
    /// which the staging pass exploits to skip local recomputes.
    pub fn has_rotation_or_shear(&self) -> bool {
        self.rotation != 0.0 || self.shear != Vec2::zeros()
    }

    /// Convert to a homogeneous transformation matrix
    pub fn to_matrix(&self) -> Mat3 {
        translation(self.position)
            * rotation_degrees(self.rotation)
            * shearing(self.shear)
            * scaling(self.scale)
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder pattern: Set shear factors
    pub fn with_shear(mut self, shear: Vec2) -> Self {
        self.shear = shear;
        self
    }

    /// Builder pattern: Set scale factors
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point2) -> Point2 {
        self.to_matrix().transform_point(&point)
    }
}
