use crate::core::rasterizer::CullMode;
use crate::error::{RenderError, Result};
use crate::pipeline::renderer::DEFAULT_OUTPUT;
use crate::pipeline::shaders::ShadingMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Scene description read from TOML. Every field has a default, so an empty file
/// renders the built-in checkerboard quad.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_background")]
    pub background_color: [f32; 3],

    // --- Pipeline & Debug ---
    #[serde(default)]
    pub shading_mode: ShadingMode,
    #[serde(default)]
    pub cull_mode: CullMode,
    #[serde(default = "default_true")]
    pub use_normal_map: bool,

    // --- Animation ---
    #[serde(default = "default_true")]
    pub rotate: bool,
    /// Degrees per second.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Seconds advanced per frame.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            background_color: default_background(),
            shading_mode: ShadingMode::default(),
            cull_mode: CullMode::default(),
            use_normal_map: true,
            rotate: true,
            rotation_speed: default_rotation_speed(),
            frames: default_frames(),
            frame_time: default_frame_time(),
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}
fn default_background() -> [f32; 3] {
    [0.39, 0.39, 0.39]
}
fn default_true() -> bool {
    true
}
fn default_rotation_speed() -> f32 {
    45.0
}
fn default_frames() -> u32 {
    1
}
fn default_frame_time() -> f32 {
    1.0 / 60.0
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Degrees.
    #[serde(default)]
    pub yaw: f32,
    /// Degrees, clamped to [-89, 89].
    #[serde(default)]
    pub pitch: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_camera_speed")]
    pub speed: f32,
    #[serde(default = "default_camera_rotation_speed")]
    pub rotation_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            position: default_camera_position(),
            yaw: 0.0,
            pitch: 0.0,
            near: default_near(),
            far: default_far(),
            speed: default_camera_speed(),
            rotation_speed: default_camera_rotation_speed(),
        }
    }
}

fn default_fov() -> f32 {
    45.0
}
fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, -10.0]
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_camera_speed() -> f32 {
    20.0
}
fn default_camera_rotation_speed() -> f32 {
    100.0
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    /// Direction the light travels.
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
    #[serde(default = "default_kd")]
    pub kd: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_depth_remap_min")]
    pub depth_remap_min: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            color: default_light_color(),
            intensity: default_light_intensity(),
            kd: default_kd(),
            shininess: default_shininess(),
            ambient: default_ambient(),
            depth_remap_min: default_depth_remap_min(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_light_intensity() -> f32 {
    1.0
}
fn default_kd() -> f32 {
    7.0
}
fn default_shininess() -> f32 {
    25.0
}
fn default_ambient() -> [f32; 3] {
    [0.025, 0.025, 0.025]
}
fn default_depth_remap_min() -> f32 {
    0.97
}

#[derive(Debug, Default, Deserialize)]
pub struct ObjectConfig {
    /// OBJ file. Without one the object is a checkerboard quad.
    pub path: Option<String>,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],

    // --- Material Textures ---
    pub diffuse_texture: Option<String>,
    pub normal_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub glossiness_texture: Option<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RenderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| RenderError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
