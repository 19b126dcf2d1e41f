use crate::core::color::colors;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::interpolation::{
    barycentric_weights, interpolate_reciprocal, is_inside_triangle, perspective_correct,
    signed_area_x2,
};
use crate::core::pipeline::{Fragment, FragmentShader};
use crate::scene::material::Material;
use nalgebra::{Point2, Vector3};
use rayon::prelude::*;
use serde::Deserialize;

const DEGENERATE_AREA: f32 = 1e-5;

/// The Rasterizer is responsible for drawing screen-space triangles onto the FrameBuffer.
pub struct Rasterizer {
    pub cull_mode: CullMode,
    /// Fill each triangle's clamped bounding box instead of its covered pixels,
    /// bypassing the coverage and depth tests.
    pub fill_bounding_box: bool,
}

/// Which screen-space winding is rejected by the coverage test.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    /// Keep triangles that appear clockwise on screen.
    #[default]
    Back,
    /// Keep triangles that appear counter-clockwise on screen.
    Front,
    None,
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
            fill_bounding_box: false,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Rasterize a single triangle of transformed vertices.
    ///
    /// Per candidate pixel: coverage test at the pixel center, reciprocal depth
    /// interpolation with frustum rejection outside [0, 1], strict less-than depth
    /// test, perspective-correct attribute interpolation, shading, then the write.
    /// Rows of the bounding box are processed in parallel; each row owns its slice of
    /// both buffers.
    pub fn rasterize_triangle<S: FragmentShader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        triangle: [&VertexOut; 3],
        material: Option<&Material>,
    ) {
        if triangle.iter().any(|v| v.culled) {
            return;
        }

        let screen_coords = triangle.map(|v| Point2::new(v.screen_x, v.screen_y));

        let Some(bbox) =
            compute_bounding_box(&screen_coords, framebuffer.width, framebuffer.height)
        else {
            return;
        };

        if self.fill_bounding_box {
            framebuffer
                .par_rows_mut(bbox.min_y..=bbox.max_y)
                .for_each(|mut row| {
                    for x in bbox.min_x..=bbox.max_x {
                        row.write_color(x, colors::WHITE);
                    }
                });
            return;
        }

        let [s0, s1, s2] = screen_coords;
        let area_x2 = signed_area_x2(s0, s1, s2);
        if area_x2.abs() < DEGENERATE_AREA || !self.accepts_winding(area_x2) {
            return;
        }

        let inverse_depth = triangle.map(|v| v.inverse_depth);
        let inverse_w = triangle.map(|v| v.inverse_w);
        let colors = triangle.map(|v| v.color);
        let uvs = triangle.map(|v| v.uv);
        let normals = triangle.map(|v| v.normal);
        let tangents = triangle.map(|v| v.tangent);
        let view_directions = triangle.map(|v| v.view_direction);

        framebuffer
            .par_rows_mut(bbox.min_y..=bbox.max_y)
            .for_each(|mut row| {
                let y = row.y;
                for x in bbox.min_x..=bbox.max_x {
                    let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                    let Some(weights) = barycentric_weights(pixel_center, s0, s1, s2) else {
                        continue;
                    };
                    if !is_inside_triangle(&weights) {
                        continue;
                    }

                    // Projected depth, recovered from the interpolated reciprocal.
                    let Some(depth) = interpolate_reciprocal(inverse_depth, &weights) else {
                        continue;
                    };
                    if !(0.0..=1.0).contains(&depth) {
                        continue;
                    }
                    if !row.depth_test(x, depth) {
                        continue;
                    }

                    let Some(view_depth) = interpolate_reciprocal(inverse_w, &weights) else {
                        continue;
                    };

                    let fragment = Fragment {
                        x,
                        y,
                        depth,
                        view_depth,
                        color: perspective_correct(colors, &weights, inverse_w, view_depth),
                        uv: perspective_correct(uvs, &weights, inverse_w, view_depth),
                        normal: normalize_or_zero(perspective_correct(
                            normals, &weights, inverse_w, view_depth,
                        )),
                        tangent: normalize_or_zero(perspective_correct(
                            tangents, &weights, inverse_w, view_depth,
                        )),
                        view_direction: normalize_or_zero(perspective_correct(
                            view_directions,
                            &weights,
                            inverse_w,
                            view_depth,
                        )),
                    };

                    if let Some(color) = shader.shade(&fragment, material) {
                        row.write(x, depth, color);
                    }
                }
            });
    }

    #[inline]
    fn accepts_winding(&self, area_x2: f32) -> bool {
        match self.cull_mode {
            CullMode::Back => area_x2 > 0.0,
            CullMode::Front => area_x2 < 0.0,
            CullMode::None => true,
        }
    }
}

/// Axis-aligned box around the three screen positions, grown by one pixel on every
/// side and clamped to `[0, width-1] x [0, height-1]`.
///
/// Returns `None` when the unclamped box lies entirely outside the buffer.
pub fn compute_bounding_box(
    points: &[Point2<f32>; 3],
    width: usize,
    height: usize,
) -> Option<BoundingBox> {
    if width == 0 || height == 0 {
        return None;
    }

    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i64 - 1;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i64 - 1;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).floor() as i64 + 1;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).floor() as i64 + 1;

    let (width, height) = (width as i64, height as i64);
    if max_x < 0 || max_y < 0 || min_x >= width || min_y >= height {
        return None;
    }

    Some(BoundingBox {
        min_x: min_x.max(0) as usize,
        min_y: min_y.max(0) as usize,
        max_x: max_x.min(width - 1) as usize,
        max_y: max_y.min(height - 1) as usize,
    })
}

#[inline]
fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorRGB;
    use nalgebra::Vector2;
    use std::sync::Mutex;

    /// Shades every fragment with its interpolated vertex color.
    struct VertexColorShader;

    impl FragmentShader for VertexColorShader {
        fn shade(&self, fragment: &Fragment, _material: Option<&Material>) -> Option<ColorRGB> {
            Some(fragment.color)
        }
    }

    /// Records every fragment handed to it.
    #[derive(Default)]
    struct RecordingShader {
        fragments: Mutex<Vec<Fragment>>,
    }

    impl FragmentShader for RecordingShader {
        fn shade(&self, fragment: &Fragment, _material: Option<&Material>) -> Option<ColorRGB> {
            self.fragments.lock().unwrap().push(*fragment);
            Some(colors::WHITE)
        }
    }

    struct DiscardShader;

    impl FragmentShader for DiscardShader {
        fn shade(&self, _fragment: &Fragment, _material: Option<&Material>) -> Option<ColorRGB> {
            None
        }
    }

    fn vertex(x: f32, y: f32, depth: f32, color: ColorRGB) -> VertexOut {
        VertexOut {
            screen_x: x,
            screen_y: y,
            inverse_depth: 1.0 / depth,
            inverse_w: 1.0,
            color,
            uv: Vector2::zeros(),
            normal: Vector3::z(),
            ..VertexOut::default()
        }
    }

    /// Clockwise on screen, covers the top-left half of a 16x16 buffer.
    fn triangle(depth: f32, color: ColorRGB) -> [VertexOut; 3] {
        [
            vertex(0.0, 0.0, depth, color),
            vertex(16.0, 0.0, depth, color),
            vertex(0.0, 16.0, depth, color),
        ]
    }

    fn refs(t: &[VertexOut; 3]) -> [&VertexOut; 3] {
        [&t[0], &t[1], &t[2]]
    }

    #[test]
    fn bounding_box_grows_and_clamps() {
        let points = [
            Point2::new(2.5, 3.5),
            Point2::new(6.2, 3.0),
            Point2::new(4.0, 8.9),
        ];
        let bbox = compute_bounding_box(&points, 100, 100).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_x: 1,
                min_y: 2,
                max_x: 7,
                max_y: 9
            }
        );

        let partly_outside = [
            Point2::new(-20.0, -5.0),
            Point2::new(5.0, 3.0),
            Point2::new(4.0, 200.0),
        ];
        let bbox = compute_bounding_box(&partly_outside, 10, 10).unwrap();
        assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (0, 0, 6, 9));
    }

    #[test]
    fn bounding_box_fully_outside_is_rejected() {
        let points = [
            Point2::new(-30.0, 1.0),
            Point2::new(-10.0, 1.0),
            Point2::new(-20.0, 5.0),
        ];
        assert!(compute_bounding_box(&points, 10, 10).is_none());
    }

    #[test]
    fn covered_pixels_take_triangle_color() {
        let mut fb = FrameBuffer::new(16, 16);
        fb.clear(colors::BLACK, f32::INFINITY);
        let tri = triangle(0.5, colors::RED);

        Rasterizer::new().rasterize_triangle(&mut fb, &VertexColorShader, refs(&tri), None);

        assert_eq!(fb.get_pixel(2, 2), Some([255, 0, 0]));
        assert_eq!(fb.get_depth(2, 2), Some(0.5));
        assert_eq!(fb.get_pixel(14, 14), Some([0, 0, 0]));
        assert_eq!(fb.get_depth(14, 14), Some(f32::INFINITY));
    }

    #[test]
    fn pixels_outside_bounding_box_are_never_tested() {
        let mut fb = FrameBuffer::new(64, 64);
        let tri = [
            vertex(4.0, 4.0, 0.5, colors::WHITE),
            vertex(12.0, 4.0, 0.5, colors::WHITE),
            vertex(4.0, 12.0, 0.5, colors::WHITE),
        ];
        let shader = RecordingShader::default();

        Rasterizer::new().rasterize_triangle(&mut fb, &shader, refs(&tri), None);

        let fragments = shader.fragments.into_inner().unwrap();
        assert!(!fragments.is_empty());
        assert!(fragments.iter().all(|f| f.x <= 13 && f.y <= 13));
    }

    #[test]
    fn back_facing_winding_is_culled() {
        let mut fb = FrameBuffer::new(16, 16);
        let tri = triangle(0.5, colors::RED);
        let reversed = [&tri[0], &tri[2], &tri[1]];

        let mut rasterizer = Rasterizer::new();
        rasterizer.rasterize_triangle(&mut fb, &VertexColorShader, reversed, None);
        assert_eq!(fb.get_pixel(2, 2), Some([0, 0, 0]));

        rasterizer.set_cull_mode(CullMode::None);
        rasterizer.rasterize_triangle(&mut fb, &VertexColorShader, reversed, None);
        assert_eq!(fb.get_pixel(2, 2), Some([255, 0, 0]));
    }

    #[test]
    fn nearer_triangle_wins_in_any_order() {
        let near = triangle(0.3, colors::RED);
        let far = triangle(0.6, colors::GREEN);
        let rasterizer = Rasterizer::new();

        let mut a = FrameBuffer::new(16, 16);
        rasterizer.rasterize_triangle(&mut a, &VertexColorShader, refs(&near), None);
        rasterizer.rasterize_triangle(&mut a, &VertexColorShader, refs(&far), None);

        let mut b = FrameBuffer::new(16, 16);
        rasterizer.rasterize_triangle(&mut b, &VertexColorShader, refs(&far), None);
        rasterizer.rasterize_triangle(&mut b, &VertexColorShader, refs(&near), None);

        assert_eq!(a.color_buffer, b.color_buffer);
        assert_eq!(a.depth_buffer, b.depth_buffer);
        assert_eq!(a.get_pixel(2, 2), Some([255, 0, 0]));
    }

    #[test]
    fn equal_depth_keeps_first_writer() {
        let first = triangle(0.5, colors::RED);
        let second = triangle(0.5, colors::BLUE);
        let mut fb = FrameBuffer::new(16, 16);
        let rasterizer = Rasterizer::new();

        rasterizer.rasterize_triangle(&mut fb, &VertexColorShader, refs(&first), None);
        rasterizer.rasterize_triangle(&mut fb, &VertexColorShader, refs(&second), None);

        assert_eq!(fb.get_pixel(2, 2), Some([255, 0, 0]));
    }

    #[test]
    fn depth_outside_unit_range_is_discarded() {
        let mut fb = FrameBuffer::new(16, 16);
        let behind_far = triangle(1.5, colors::RED);
        Rasterizer::new().rasterize_triangle(&mut fb, &VertexColorShader, refs(&behind_far), None);
        assert!(fb.depth_buffer.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn discarded_fragments_leave_depth_untouched() {
        let mut fb = FrameBuffer::new(16, 16);
        let tri = triangle(0.5, colors::RED);
        Rasterizer::new().rasterize_triangle(&mut fb, &DiscardShader, refs(&tri), None);
        assert!(fb.depth_buffer.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn culled_vertex_skips_triangle() {
        let mut fb = FrameBuffer::new(16, 16);
        let mut tri = triangle(0.5, colors::RED);
        tri[1].culled = true;
        Rasterizer::new().rasterize_triangle(&mut fb, &VertexColorShader, refs(&tri), None);
        assert!(fb.depth_buffer.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn degenerate_triangle_produces_no_pixels() {
        let mut fb = FrameBuffer::new(16, 16);
        let tri = [
            vertex(1.0, 1.0, 0.5, colors::RED),
            vertex(8.0, 8.0, 0.5, colors::RED),
            vertex(15.0, 15.0, 0.5, colors::RED),
        ];
        let mut rasterizer = Rasterizer::new();
        rasterizer.set_cull_mode(CullMode::None);
        rasterizer.rasterize_triangle(&mut fb, &VertexColorShader, refs(&tri), None);
        assert!(fb.depth_buffer.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn interpolated_directions_are_unit_length() {
        let mut fb = FrameBuffer::new(16, 16);
        let mut tri = triangle(0.5, colors::WHITE);
        let directions = [Vector3::x(), Vector3::y(), Vector3::z()];
        for ((v, n), inverse_w) in tri.iter_mut().zip(directions).zip([1.0, 0.5, 0.25]) {
            v.normal = n;
            v.tangent = Vector3::new(n.y, n.z, n.x);
            v.inverse_w = inverse_w;
        }
        let shader = RecordingShader::default();

        Rasterizer::new().rasterize_triangle(&mut fb, &shader, refs(&tri), None);

        let fragments = shader.fragments.into_inner().unwrap();
        assert!(fragments.len() > 50);
        for f in &fragments {
            assert!((f.normal.norm() - 1.0).abs() < 1e-5, "normal {:?}", f.normal);
            assert!((f.tangent.norm() - 1.0).abs() < 1e-5, "tangent {:?}", f.tangent);
        }
        // Away from the vertices the blend is genuinely mixed.
        let inner = fragments.iter().find(|f| (f.x, f.y) == (4, 4)).unwrap();
        assert!(inner.normal.iter().all(|&c| c > 0.1));
    }

    #[test]
    fn bounding_box_fill_ignores_coverage_and_depth() {
        let mut fb = FrameBuffer::new(16, 16);
        let tri = triangle(0.5, colors::RED);
        let mut rasterizer = Rasterizer::new();
        rasterizer.fill_bounding_box = true;

        rasterizer.rasterize_triangle(&mut fb, &VertexColorShader, refs(&tri), None);

        assert_eq!(fb.get_pixel(14, 14), Some([255, 255, 255]));
        assert!(fb.depth_buffer.iter().all(|d| d.is_infinite()));
    }
}
