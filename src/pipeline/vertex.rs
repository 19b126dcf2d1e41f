use crate::core::geometry::{Vertex, VertexOut};
use crate::core::math::transform::ndc_to_screen;
use crate::scene::camera::Camera;
use nalgebra::{Matrix4, Point3};
use rayon::prelude::*;

/// Clip-space `w` at or below this is treated as lying on the camera plane.
const MIN_CLIP_W: f32 = 1e-6;

/// Projects one world-space vertex to screen space.
///
/// The vertex is flagged `culled` only when it cannot be projected at all: on or
/// behind the camera plane. Triangles using it are skipped by the rasterizer.
pub fn transform_vertex(
    vertex: &Vertex,
    view_projection: &Matrix4<f32>,
    camera_position: &Point3<f32>,
    width: f32,
    height: f32,
) -> VertexOut {
    let clip = view_projection * vertex.position.to_homogeneous();
    if !clip.iter().all(|c| c.is_finite()) || clip.w <= MIN_CLIP_W {
        return VertexOut::culled();
    }

    let inverse_w = 1.0 / clip.w;
    let ndc_x = clip.x * inverse_w;
    let ndc_y = clip.y * inverse_w;
    // May fall outside [0, 1] (closer than the near plane); such pixels are
    // rejected by the rasterizer's per-pixel depth range check.
    let ndc_z = clip.z * inverse_w;

    let screen = ndc_to_screen(ndc_x, ndc_y, width, height);

    VertexOut {
        screen_x: screen.x,
        screen_y: screen.y,
        inverse_depth: 1.0 / ndc_z,
        inverse_w,
        color: vertex.color,
        uv: vertex.uv,
        normal: vertex.normal,
        tangent: vertex.tangent,
        view_direction: vertex.position - camera_position,
        culled: false,
    }
}

/// Runs the vertex stage over a whole world mesh, writing into `out` (resized to
/// match, allocation reused across frames).
pub fn transform_vertices(
    vertices: &[Vertex],
    camera: &Camera,
    width: usize,
    height: usize,
    out: &mut Vec<VertexOut>,
) {
    let view_projection = camera.view_projection();
    let camera_position = camera.position();
    let (width, height) = (width as f32, height as f32);

    vertices
        .par_iter()
        .map(|v| transform_vertex(v, &view_projection, &camera_position, width, height))
        .collect_into_vec(out);
}
