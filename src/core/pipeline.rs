use crate::core::color::ColorRGB;
use crate::scene::material::Material;
use nalgebra::{Vector2, Vector3};

/// Per-pixel attributes produced by the rasterizer for a covered pixel that passed
/// the depth test.
///
/// Every attribute is interpolated perspective-correctly. Directions are
/// renormalized after interpolation (a zero vector stays zero).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Pixel coordinates.
    pub x: usize,
    pub y: usize,
    /// Projected depth in [0, 1], as stored in the depth buffer.
    pub depth: f32,
    /// Interpolated view-space depth (the perspective-correction denominator).
    pub view_depth: f32,
    pub color: ColorRGB,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    /// Unit vector from the camera towards the surface point.
    pub view_direction: Vector3<f32>,
}

/// Programmable pixel stage.
///
/// Implementations must be thread-safe (Send + Sync) because rows of a triangle are
/// shaded concurrently.
pub trait FragmentShader: Send + Sync {
    /// Computes the final linear RGB color of a fragment.
    ///
    /// Returning `None` discards the fragment: neither the color nor the depth buffer
    /// is written. The returned color may exceed 1.0; the framebuffer normalizes it.
    ///
    /// # Arguments
    /// - `fragment`: interpolated per-pixel data.
    /// - `material`: material of the mesh being drawn, if any.
    fn shade(&self, fragment: &Fragment, material: Option<&Material>) -> Option<ColorRGB>;
}
