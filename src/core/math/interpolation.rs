use nalgebra::{Point2, Vector2, Vector3};
use std::ops::{Add, Mul};

const EPSILON: f32 = 1e-5;

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination used by barycentric interpolation.
/// - Send + Sync: safe to use from multiple threads during parallel rasterization.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync {}

impl<T> Interpolatable for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> + Send + Sync {}

/// 2D cross product (z component of the 3D cross product).
#[inline(always)]
pub fn cross_2d(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of the screen-space triangle (v0, v1, v2).
///
/// Positive for triangles that appear clockwise on screen (Y pointing down),
/// which is the front-facing winding of the left-handed pipeline.
#[inline]
pub fn signed_area_x2(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    cross_2d(v1 - v0, v2 - v1)
}

/// Calculates the barycentric weights of point `p` with respect to triangle (v0, v1, v2).
///
/// Each weight is the signed area spanned by `p` and the edge opposite to the vertex,
/// normalized by the total signed area, so `weights[i]` is the coordinate of vertex `i`
/// and the three weights sum to 1. A point that coincides with a vertex gets that
/// vertex's unit weight directly.
///
/// Returns `None` if the triangle is degenerate (area is near zero).
pub fn barycentric_weights(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let area_x2 = signed_area_x2(v0, v1, v2);
    if area_x2.abs() < EPSILON {
        return None;
    }

    if p == v0 {
        return Some(Vector3::x());
    }
    if p == v1 {
        return Some(Vector3::y());
    }
    if p == v2 {
        return Some(Vector3::z());
    }

    let inv_area_x2 = 1.0 / area_x2;
    let w0 = cross_2d(v2 - v1, p - v1);
    let w1 = cross_2d(v0 - v2, p - v2);
    let w2 = cross_2d(v1 - v0, p - v0);

    Some(Vector3::new(w0, w1, w2) * inv_area_x2)
}

/// Checks if the barycentric weights represent a point inside the triangle.
/// Points exactly on an edge count as inside.
#[inline(always)]
pub fn is_inside_triangle(weights: &Vector3<f32>) -> bool {
    weights.x >= 0.0 && weights.y >= 0.0 && weights.z >= 0.0
}

/// Plain screen-space interpolation, `sum(weight_i * value_i)`.
#[inline]
pub fn interpolate<T: Interpolatable>(values: [T; 3], weights: &Vector3<f32>) -> T {
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}

/// Interpolates a quantity stored as a reciprocal and returns the recovered value,
/// `1 / sum(weight_i * reciprocal_i)`.
///
/// Used for the buffer depth (from `1/z_ndc`) and the view-space depth (from `1/w`).
/// Returns `None` when the denominator vanishes or is not finite.
#[inline]
pub fn interpolate_reciprocal(reciprocals: [f32; 3], weights: &Vector3<f32>) -> Option<f32> {
    let sum =
        reciprocals[0] * weights.x + reciprocals[1] * weights.y + reciprocals[2] * weights.z;
    if sum == 0.0 || !sum.is_finite() {
        return None;
    }
    Some(1.0 / sum)
}

/// Perspective-correct interpolation of a per-vertex attribute:
/// `sum(weight_i * value_i * inverse_w_i) * view_depth`,
/// where `view_depth = 1 / sum(weight_i * inverse_w_i)`.
#[inline]
pub fn perspective_correct<T: Interpolatable>(
    values: [T; 3],
    weights: &Vector3<f32>,
    inverse_w: [f32; 3],
    view_depth: f32,
) -> T {
    (values[0] * (weights.x * inverse_w[0])
        + values[1] * (weights.y * inverse_w[1])
        + values[2] * (weights.z * inverse_w[2]))
        * view_depth
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn triangle() -> [Point2<f32>; 3] {
        [
            Point2::new(10.0, 10.0),
            Point2::new(50.0, 10.0),
            Point2::new(10.0, 40.0),
        ]
    }

    #[test]
    fn centroid_has_equal_positive_weights() {
        let [v0, v1, v2] = triangle();
        let centroid = Point2::from((v0.coords + v1.coords + v2.coords) / 3.0);
        let w = barycentric_weights(centroid, v0, v1, v2).unwrap();

        assert!(is_inside_triangle(&w));
        assert!((w.x + w.y + w.z - 1.0).abs() < EPS);
        for i in 0..3 {
            assert!((w[i] - 1.0 / 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn weight_belongs_to_its_vertex() {
        let [v0, v1, v2] = triangle();
        let near_v1 = Point2::new(48.0, 11.0);
        let w = barycentric_weights(near_v1, v0, v1, v2).unwrap();
        assert!(w.y > w.x && w.y > w.z);
    }

    #[test]
    fn vertex_coincidence_short_circuits() {
        let [v0, v1, v2] = triangle();
        assert_eq!(barycentric_weights(v2, v0, v1, v2), Some(Vector3::z()));
    }

    #[test]
    fn outside_point_has_negative_weight() {
        let [v0, v1, v2] = triangle();
        let w = barycentric_weights(Point2::new(60.0, 60.0), v0, v1, v2).unwrap();
        assert!(!is_inside_triangle(&w));
    }

    #[test]
    fn opposite_winding_still_yields_unit_sum() {
        let [v0, v1, v2] = triangle();
        assert!(signed_area_x2(v0, v1, v2) > 0.0);
        assert!(signed_area_x2(v0, v2, v1) < 0.0);

        let p = Point2::new(15.0, 15.0);
        let w = barycentric_weights(p, v0, v2, v1).unwrap();
        assert!(is_inside_triangle(&w));
        assert!((w.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(5.0, 5.0);
        let c = Point2::new(10.0, 10.0);
        assert!(barycentric_weights(Point2::new(1.0, 2.0), a, b, c).is_none());
    }

    #[test]
    fn reciprocal_interpolation_recovers_constant() {
        let w = Vector3::new(0.2, 0.3, 0.5);
        let depth = interpolate_reciprocal([1.0 / 0.8; 3], &w).unwrap();
        assert!((depth - 0.8).abs() < EPS);
        assert!(interpolate_reciprocal([0.0; 3], &w).is_none());
    }

    #[test]
    fn perspective_correction_is_identity_for_equal_depths() {
        let w = Vector3::new(0.25, 0.25, 0.5);
        let values = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ];
        let inverse_w = [0.5; 3];
        let view_depth = interpolate_reciprocal(inverse_w, &w).unwrap();

        let corrected = perspective_correct(values, &w, inverse_w, view_depth);
        let linear = interpolate(values, &w);
        assert!((corrected - linear).norm() < EPS);
    }

    #[test]
    fn perspective_correction_favors_nearer_vertex() {
        let w = Vector3::new(0.5, 0.5, 0.0);
        // Vertex 0 is four times nearer than vertex 1.
        let inverse_w = [1.0 / 2.0, 1.0 / 8.0, 1.0];
        let view_depth = interpolate_reciprocal(inverse_w, &w).unwrap();

        let value = perspective_correct([0.0_f32, 1.0, 0.0], &w, inverse_w, view_depth);
        assert!((value - 0.2).abs() < EPS);
    }
}
