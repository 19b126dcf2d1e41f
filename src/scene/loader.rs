use crate::core::color::{ColorRGB, colors};
use crate::core::math::transform::TransformFactory;
use crate::io::config::{Config, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::phong::PhongShader;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::scene_object::SceneObject;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Builds the camera described by the config, oriented by its yaw and pitch.
pub fn build_camera(config: &Config) -> Camera {
    let cam = &config.camera;
    let aspect_ratio = config.render.width as f32 / config.render.height.max(1) as f32;

    let mut camera = Camera::new(
        cam.fov,
        Point3::from(cam.position),
        cam.near,
        cam.far,
        aspect_ratio,
    );
    camera.speed = cam.speed;
    camera.rotation_speed = cam.rotation_speed;
    camera.set_total_yaw(cam.yaw);
    camera.set_total_pitch(cam.pitch);
    camera.refresh();
    camera
}

pub fn build_shader(config: &Config) -> PhongShader {
    let l = &config.light;
    let light = Light::new_directional(Vector3::from(l.direction), ColorRGB::from(l.color), l.intensity);

    let mut shader = PhongShader::new(light);
    shader.mode = config.render.shading_mode;
    shader.kd = l.kd;
    shader.shininess = l.shininess;
    shader.ambient = ColorRGB::from(l.ambient);
    shader.use_normal_map = config.render.use_normal_map;
    shader.depth_remap_min = l.depth_remap_min;
    shader
}

/// Initial resource loading (Heavy I/O). Assets that fail to load are replaced by
/// built-in geometry or constant material values, so this never fails.
pub fn build_renderer(config: &Config) -> Renderer {
    let render = &config.render;
    let mut renderer = Renderer::new(render.width, render.height, build_camera(config));

    renderer.shader = build_shader(config);
    renderer.set_shading_mode(render.shading_mode);
    renderer.rasterizer.set_cull_mode(render.cull_mode);
    renderer.background = ColorRGB::from(render.background_color);
    renderer.rotation_speed = render.rotation_speed;
    renderer.set_rotation(render.rotate);

    if config.objects.is_empty() {
        info!("No objects configured. Using the checkerboard quad.");
        renderer.add_object(default_object(&ObjectConfig::default()));
    }
    for obj_conf in &config.objects {
        renderer.add_object(build_object(obj_conf));
    }

    info!(
        "Scene initialized with {} objects at {}x{}.",
        renderer.objects.len(),
        render.width,
        render.height
    );
    renderer
}

fn build_object(obj_conf: &ObjectConfig) -> SceneObject {
    let Some(path) = &obj_conf.path else {
        return default_object(obj_conf);
    };

    let mesh = match load_obj(path) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("Error loading model '{}': {}. Using fallback mesh.", path, e);
            return default_object(obj_conf);
        }
    };

    let mut material = Material::default();
    material.diffuse_texture = load_texture(obj_conf.diffuse_texture.as_deref(), "Diffuse");
    material.normal_texture = load_texture(obj_conf.normal_texture.as_deref(), "Normal");
    material.specular_texture = load_texture(obj_conf.specular_texture.as_deref(), "Specular");
    material.glossiness_texture =
        load_texture(obj_conf.glossiness_texture.as_deref(), "Glossiness");

    SceneObject::new(mesh, placement(obj_conf), material)
}

/// Checkerboard quad, with any configured textures layered on top.
fn default_object(obj_conf: &ObjectConfig) -> SceneObject {
    let checker = Texture::checkerboard(8, colors::WHITE, colors::GRAY);
    let mut material = Material::default().with_diffuse_texture(Arc::new(checker));
    if let Some(tex) = load_texture(obj_conf.diffuse_texture.as_deref(), "Diffuse") {
        material.diffuse_texture = Some(tex);
    }
    material.normal_texture = load_texture(obj_conf.normal_texture.as_deref(), "Normal");

    SceneObject::new(Mesh::create_quad(3.0, 0.0), placement(obj_conf), material)
}

fn placement(obj_conf: &ObjectConfig) -> nalgebra::Matrix4<f32> {
    TransformFactory::translation(&Vector3::from(obj_conf.position))
}

fn load_texture(path: Option<&str>, kind: &str) -> Option<Arc<Texture>> {
    let path = path?;
    match Texture::load(path) {
        Ok(tex) => Some(Arc::new(tex)),
        Err(e) => {
            warn!("Failed to load {} texture '{}': {}", kind, path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rasterizer::CullMode;
    use crate::pipeline::shaders::ShadingMode;

    #[test]
    fn empty_config_builds_quad_scene() {
        let config: Config = toml::from_str("").unwrap();
        let renderer = build_renderer(&config);
        assert_eq!(renderer.objects.len(), 1);
        assert_eq!(renderer.width(), 640);
        assert!(renderer.objects[0].material.diffuse_texture.is_some());
        assert!((renderer.camera.aspect_ratio() - 640.0 / 480.0).abs() < 1e-6);
    }

    #[test]
    fn missing_assets_fall_back() {
        let config: Config = toml::from_str(
            r#"
            [render]
            shading_mode = "diffuse"
            cull_mode = "front"

            [[objects]]
            path = "missing/model.obj"
            normal_texture = "missing/normal.png"
            "#,
        )
        .unwrap();

        let renderer = build_renderer(&config);
        assert_eq!(renderer.objects.len(), 1);
        assert!(renderer.objects[0].material.normal_texture.is_none());
        assert_eq!(renderer.shading_mode(), ShadingMode::Diffuse);
        assert_eq!(renderer.rasterizer.cull_mode, CullMode::Front);
    }

    #[test]
    fn camera_orientation_comes_from_config() {
        let config: Config = toml::from_str("[camera]\nyaw = 90.0\npitch = 200.0").unwrap();
        let camera = build_camera(&config);
        assert_eq!(camera.total_pitch(), 89.0);
        assert!(camera.forward().x > 0.0);
    }
}
