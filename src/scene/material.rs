use crate::core::color::{ColorRGB, colors};
use crate::scene::texture::Texture;
use nalgebra::{Vector2, Vector3};
use std::sync::Arc;

/// Surface description sampled by the shaders.
///
/// Each map is optional; a missing map falls back to the matching constant.
#[derive(Debug, Clone)]
pub struct Material {
    pub diffuse_color: ColorRGB,
    pub specular_color: ColorRGB,
    /// Multiplies the shader's shininess exponent.
    pub glossiness: f32,

    pub diffuse_texture: Option<Arc<Texture>>,
    /// Tangent-space normals encoded as RGB in [0, 1].
    pub normal_texture: Option<Arc<Texture>>,
    pub specular_texture: Option<Arc<Texture>>,
    /// Glossiness in the red channel.
    pub glossiness_texture: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: colors::WHITE,
            specular_color: colors::GRAY,
            glossiness: 1.0,
            diffuse_texture: None,
            normal_texture: None,
            specular_texture: None,
            glossiness_texture: None,
        }
    }
}

impl Material {
    pub fn with_diffuse_texture(mut self, texture: Arc<Texture>) -> Self {
        self.diffuse_texture = Some(texture);
        self
    }

    pub fn with_normal_texture(mut self, texture: Arc<Texture>) -> Self {
        self.normal_texture = Some(texture);
        self
    }

    pub fn diffuse(&self, uv: &Vector2<f32>) -> ColorRGB {
        match &self.diffuse_texture {
            Some(tex) => tex.sample(uv.x, uv.y),
            None => self.diffuse_color,
        }
    }

    pub fn specular(&self, uv: &Vector2<f32>) -> ColorRGB {
        match &self.specular_texture {
            Some(tex) => tex.sample(uv.x, uv.y),
            None => self.specular_color,
        }
    }

    pub fn glossiness(&self, uv: &Vector2<f32>) -> f32 {
        match &self.glossiness_texture {
            Some(tex) => tex.sample(uv.x, uv.y).x,
            None => self.glossiness,
        }
    }

    /// Tangent-space normal remapped from [0, 1] to [-1, 1], or `None` without a
    /// normal map.
    pub fn tangent_space_normal(&self, uv: &Vector2<f32>) -> Option<Vector3<f32>> {
        self.normal_texture
            .as_ref()
            .map(|tex| tex.sample(uv.x, uv.y) * 2.0 - Vector3::repeat(1.0))
    }
}
