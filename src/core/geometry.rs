use crate::core::color::{ColorRGB, colors};
use nalgebra::{Point3, Vector2, Vector3};

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space (world space once the object transform is applied).
    pub position: Point3<f32>,
    /// Per-vertex color.
    pub color: ColorRGB,
    /// Texture coordinates (UV), nominally in [0, 1], origin at the top-left texel.
    pub uv: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector for Normal Mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            color: colors::WHITE,
            uv,
            normal,
            tangent: Vector3::zeros(),
        }
    }

    pub fn with_color(mut self, color: ColorRGB) -> Self {
        self.color = color;
        self
    }

    pub fn with_tangent(mut self, tangent: Vector3<f32>) -> Self {
        self.tangent = tangent;
        self
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::zeros(), Vector2::zeros())
    }
}

/// A vertex after the transformation stage, ready for rasterization.
///
/// Created fresh every frame; the reciprocals are kept instead of the raw values so
/// the rasterizer can interpolate them linearly in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOut {
    /// Screen-space position in pixels (Y down).
    pub screen_x: f32,
    pub screen_y: f32,
    /// `1 / z_ndc`: reciprocal of the projected depth.
    pub inverse_depth: f32,
    /// `1 / w_clip`: reciprocal of the view-space depth.
    pub inverse_w: f32,
    pub color: ColorRGB,
    pub uv: Vector2<f32>,
    /// World-space normal.
    pub normal: Vector3<f32>,
    /// World-space tangent.
    pub tangent: Vector3<f32>,
    /// Vertex world position minus camera position (not normalized).
    pub view_direction: Vector3<f32>,
    /// Set when the vertex could not be projected (on or behind the camera plane).
    pub culled: bool,
}

impl VertexOut {
    /// A vertex that failed projection. Triangles referencing it are skipped.
    pub fn culled() -> Self {
        Self {
            culled: true,
            ..Self::default()
        }
    }
}

impl Default for VertexOut {
    fn default() -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            inverse_depth: 0.0,
            inverse_w: 0.0,
            color: colors::WHITE,
            uv: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
            view_direction: Vector3::zeros(),
            culled: false,
        }
    }
}

/// How an index list forms triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    /// Every three indices form one triangle.
    #[default]
    TriangleList,
    /// Every index after the second forms a triangle with the two before it.
    TriangleStrip,
}
