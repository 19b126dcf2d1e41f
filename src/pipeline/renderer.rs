use crate::core::color::ColorRGB;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::transform::TransformFactory;
use crate::core::pipeline::FragmentShader;
use crate::core::rasterizer::Rasterizer;
use crate::error::Result;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::shaders::ShadingMode;
use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::vertex::transform_vertices;
use crate::scene::camera::{Camera, CameraInput};
use crate::scene::scene_object::SceneObject;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_OUTPUT: &str = "Rasterizer_ColorBuffer.bmp";

/// The high-level renderer that orchestrates the pipeline stages.
///
/// A frame is: clear, transform every object's world vertices, rasterize its
/// triangles in index order, shade. Buffers and the transformed-vertex scratch
/// space live here and are reused from frame to frame.
pub struct Renderer {
    pub framebuffer: FrameBuffer,
    pub rasterizer: Rasterizer,
    pub camera: Camera,
    pub shader: PhongShader,
    pub objects: Vec<SceneObject>,
    pub background: ColorRGB,

    /// Model rotation about +Y, in degrees per second.
    pub rotation_speed: f32,
    rotate: bool,
    acc_time: f32,

    shading_mode: ShadingMode,
    previous_shading_mode: ShadingMode,

    vertices_out: Vec<VertexOut>,
}

impl Renderer {
    pub fn new(width: usize, height: usize, mut camera: Camera) -> Self {
        camera.set_aspect_ratio(width as f32 / height.max(1) as f32);
        let shader = PhongShader::default();
        let shading_mode = shader.mode;

        Self {
            framebuffer: FrameBuffer::new(width, height),
            rasterizer: Rasterizer::new(),
            camera,
            shader,
            objects: Vec::new(),
            background: ColorRGB::new(0.39, 0.39, 0.39),
            rotation_speed: 45.0,
            rotate: true,
            acc_time: 0.0,
            shading_mode,
            previous_shading_mode: shading_mode,
            vertices_out: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Advances the camera and the model animation by `delta_time` seconds and
    /// re-derives every object's world mesh.
    pub fn update(&mut self, delta_time: f32, input: &CameraInput) {
        self.camera.update(delta_time, input);

        if self.rotate {
            self.acc_time += delta_time;
        }
        let rotation = TransformFactory::rotation_y(self.model_yaw().to_radians());
        for object in &mut self.objects {
            object.update_world(&rotation);
        }
    }

    /// Current model rotation in degrees.
    pub fn model_yaw(&self) -> f32 {
        self.rotation_speed * self.acc_time
    }

    /// Renders one frame with the built-in Phong shader in the current mode.
    pub fn render(&mut self) {
        let Self {
            framebuffer,
            rasterizer,
            camera,
            shader,
            objects,
            background,
            shading_mode,
            vertices_out,
            ..
        } = self;

        shader.mode = *shading_mode;
        rasterizer.fill_bounding_box = *shading_mode == ShadingMode::BoundingBox;

        draw_frame(
            framebuffer,
            rasterizer,
            camera,
            objects,
            vertices_out,
            *background,
            &*shader,
        );
    }

    /// Renders one frame with a caller-supplied shader.
    pub fn render_with<S: FragmentShader>(&mut self, shader: &S) {
        self.rasterizer.fill_bounding_box = self.shading_mode == ShadingMode::BoundingBox;
        draw_frame(
            &mut self.framebuffer,
            &self.rasterizer,
            &self.camera,
            &self.objects,
            &mut self.vertices_out,
            self.background,
            shader,
        );
    }

    pub fn save_buffer_to_image<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_buffer_to_image(&self.framebuffer, path.as_ref())
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.shading_mode
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        self.shading_mode = mode;
        if mode.is_lit() {
            self.previous_shading_mode = mode;
        }
    }

    pub fn cycle_shading_mode(&mut self) {
        self.set_shading_mode(self.shading_mode.cycle());
        info!("Shading mode: {}", self.shading_mode.label());
    }

    /// Switches to the depth visualization, or back to the mode active before it.
    pub fn toggle_depth_buffer_visibility(&mut self) {
        self.toggle_visualization(ShadingMode::DepthBuffer);
    }

    /// Switches to the bounding-box visualization, or back to the mode active before it.
    pub fn toggle_bounding_box_visibility(&mut self) {
        self.toggle_visualization(ShadingMode::BoundingBox);
    }

    fn toggle_visualization(&mut self, mode: ShadingMode) {
        if self.shading_mode == mode {
            self.shading_mode = self.previous_shading_mode;
        } else {
            if self.shading_mode.is_lit() {
                self.previous_shading_mode = self.shading_mode;
            }
            self.shading_mode = mode;
        }
        info!("Shading mode: {}", self.shading_mode.label());
    }

    pub fn toggle_normal_map(&mut self) {
        self.shader.use_normal_map = !self.shader.use_normal_map;
        info!("Normal map: {}", on_off(self.shader.use_normal_map));
    }

    pub fn toggle_rotation(&mut self) {
        self.rotate = !self.rotate;
        info!("Rotation: {}", on_off(self.rotate));
    }

    pub fn set_rotation(&mut self, rotate: bool) {
        self.rotate = rotate;
    }

    pub fn is_rotating(&self) -> bool {
        self.rotate
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

fn draw_frame<S: FragmentShader>(
    framebuffer: &mut FrameBuffer,
    rasterizer: &Rasterizer,
    camera: &Camera,
    objects: &[SceneObject],
    vertices_out: &mut Vec<VertexOut>,
    background: ColorRGB,
    shader: &S,
) {
    let start = Instant::now();
    framebuffer.clear(background, f32::INFINITY);

    let mut triangles = 0usize;
    for object in objects {
        transform_vertices(
            &object.world.vertices,
            camera,
            framebuffer.width,
            framebuffer.height,
            vertices_out,
        );

        for [a, b, c] in object.mesh().triangles() {
            let triangle = [
                &vertices_out[a as usize],
                &vertices_out[b as usize],
                &vertices_out[c as usize],
            ];
            rasterizer.rasterize_triangle(framebuffer, shader, triangle, Some(&object.material));
            triangles += 1;
        }
    }

    debug!(
        "Frame: {} objects, {} triangles in {:.2?}",
        objects.len(),
        triangles,
        start.elapsed()
    );
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Material;
    use crate::scene::mesh::Mesh;
    use nalgebra::{Matrix4, Point3};

    fn renderer() -> Renderer {
        let camera = Camera::new(60.0, Point3::new(0.0, 0.0, -10.0), 0.1, 100.0, 1.0);
        let mut r = Renderer::new(32, 32, camera);
        r.add_object(SceneObject::new(
            Mesh::create_quad(2.0, 0.0),
            Matrix4::identity(),
            Material::default(),
        ));
        r
    }

    #[test]
    fn visualization_toggles_restore_previous_mode() {
        let mut r = renderer();
        r.set_shading_mode(ShadingMode::Specular);

        r.toggle_depth_buffer_visibility();
        assert_eq!(r.shading_mode(), ShadingMode::DepthBuffer);
        r.toggle_bounding_box_visibility();
        assert_eq!(r.shading_mode(), ShadingMode::BoundingBox);
        r.toggle_bounding_box_visibility();
        assert_eq!(r.shading_mode(), ShadingMode::Specular);

        r.toggle_depth_buffer_visibility();
        r.toggle_depth_buffer_visibility();
        assert_eq!(r.shading_mode(), ShadingMode::Specular);
    }

    #[test]
    fn cycling_leaves_visualizations() {
        let mut r = renderer();
        r.set_shading_mode(ShadingMode::Combined);
        r.cycle_shading_mode();
        assert_eq!(r.shading_mode(), ShadingMode::ObservedArea);

        r.toggle_depth_buffer_visibility();
        r.cycle_shading_mode();
        assert_eq!(r.shading_mode(), ShadingMode::ObservedArea);

        r.toggle_normal_map();
        assert!(!r.shader.use_normal_map);
        r.render();
        assert!(!r.shader.use_normal_map);
    }

    #[test]
    fn camera_changes_apply_on_next_update() {
        let mut r = renderer();
        let before = r.camera.position();
        r.camera_mut().increase_fov();
        r.camera_mut().scroll(1.0);
        r.update(0.0, &CameraInput::default());
        assert!((r.camera.fov_angle() - 61.0).abs() < 1e-4);
        assert!(r.camera.position().z > before.z);
    }

    #[test]
    fn rotation_accumulates_only_while_enabled() {
        let mut r = renderer();
        r.rotation_speed = 90.0;
        r.update(1.0, &CameraInput::default());
        assert!((r.model_yaw() - 90.0).abs() < 1e-4);

        r.toggle_rotation();
        r.update(1.0, &CameraInput::default());
        assert!((r.model_yaw() - 90.0).abs() < 1e-4);
        assert!(!r.is_rotating());
    }

    #[test]
    fn render_clears_to_background() {
        let mut r = renderer();
        r.objects.clear();
        r.background = ColorRGB::new(0.0, 0.0, 1.0);
        r.render();
        assert!(r.framebuffer.color_buffer.iter().all(|&p| p == 0xFF0000FF));
        assert!(r.framebuffer.depth_buffer.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn bounding_box_mode_leaves_depth_cleared() {
        let mut r = renderer();
        r.toggle_bounding_box_visibility();
        r.render();
        assert_eq!(r.framebuffer.get_pixel(16, 16), Some([255, 255, 255]));
        assert!(r.framebuffer.depth_buffer.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn lit_quad_writes_depth() {
        let mut r = renderer();
        r.shader.light = crate::scene::light::Light::new_directional(
            nalgebra::Vector3::z(),
            crate::core::color::colors::WHITE,
            1.0,
        );
        r.render();
        let depth = r.framebuffer.get_depth(16, 16).unwrap();
        assert!(depth > 0.0 && depth < 1.0);
    }
}
