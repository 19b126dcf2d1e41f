use crate::core::color::{ColorRGB, colors};
use crate::core::math::{reflect, remap};
use crate::core::pipeline::{Fragment, FragmentShader};
use crate::pipeline::shaders::ShadingMode;
use crate::scene::light::Light;
use crate::scene::material::Material;
use nalgebra::Vector3;
use std::f32::consts::PI;

/// Lambert diffuse + Phong specular under a single directional light, with
/// optional tangent-space normal mapping and the debug visualizations.
#[derive(Debug, Clone)]
pub struct PhongShader {
    pub mode: ShadingMode,
    pub light: Light,
    /// Diffuse reflectance scale.
    pub kd: f32,
    /// Base specular exponent, multiplied by the material glossiness.
    pub shininess: f32,
    pub ambient: ColorRGB,
    pub use_normal_map: bool,
    /// Depth range stretched to [0, 1] in `ShadingMode::DepthBuffer`.
    pub depth_remap_min: f32,

    // Fallback Material (used if no material is passed to fragment)
    pub fallback_material: Material,
}

impl Default for PhongShader {
    fn default() -> Self {
        Self::new(Light::default())
    }
}

impl PhongShader {
    pub fn new(light: Light) -> Self {
        Self {
            mode: ShadingMode::Combined,
            light,
            kd: 7.0,
            shininess: 25.0,
            ambient: ColorRGB::new(0.025, 0.025, 0.025),
            use_normal_map: true,
            depth_remap_min: 0.97,
            fallback_material: Material::default(),
        }
    }

    /// Geometric normal, or the normal-map normal expressed in the
    /// (tangent, bitangent, normal) frame when mapping is on and possible.
    pub fn shading_normal(&self, fragment: &Fragment, material: &Material) -> Vector3<f32> {
        let normal = fragment.normal;
        if !self.use_normal_map || fragment.tangent == Vector3::zeros() {
            return normal;
        }
        let Some(sample) = material.tangent_space_normal(&fragment.uv) else {
            return normal;
        };

        let tangent = fragment.tangent;
        let bitangent = normal.cross(&tangent);
        let mapped = tangent * sample.x + bitangent * sample.y + normal * sample.z;
        mapped.try_normalize(1e-12).unwrap_or(normal)
    }

    fn shade_lit(&self, fragment: &Fragment, material: &Material) -> Option<ColorRGB> {
        let normal = self.shading_normal(fragment, material);

        // Surfaces facing away from the light are not drawn at all.
        let observed_area = self.light.observed_area(&normal);
        if observed_area < 0.0 {
            return None;
        }

        let uv = &fragment.uv;

        // Lambert
        let lambert = material.diffuse(uv) * self.kd / PI;

        // Phong
        let reflected = reflect(&self.light.direction_to_light(), &normal);
        let cos_alpha = reflected.dot(&fragment.view_direction).max(0.0);
        let phong =
            material.specular(uv) * cos_alpha.powf(material.glossiness(uv) * self.shininess);

        let color = match self.mode {
            ShadingMode::ObservedArea => ColorRGB::repeat(observed_area),
            ShadingMode::Diffuse => lambert * observed_area,
            ShadingMode::Specular => phong * observed_area,
            _ => {
                self.light
                    .radiance()
                    .component_mul(&(self.ambient + lambert + phong))
                    * observed_area
            }
        };
        Some(color)
    }
}

impl FragmentShader for PhongShader {
    fn shade(&self, fragment: &Fragment, material: Option<&Material>) -> Option<ColorRGB> {
        match self.mode {
            ShadingMode::DepthBuffer => Some(ColorRGB::repeat(remap(
                fragment.depth,
                self.depth_remap_min,
                1.0,
                0.0,
                1.0,
            ))),
            ShadingMode::BoundingBox => Some(colors::WHITE),
            _ => self.shade_lit(fragment, material.unwrap_or(&self.fallback_material)),
        }
    }
}
