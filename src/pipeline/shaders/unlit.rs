use crate::core::color::ColorRGB;
use crate::core::pipeline::{Fragment, FragmentShader};
use crate::scene::material::Material;

/// Outputs the diffuse texture, or the interpolated vertex color tinted by the
/// material's diffuse color. No lighting.
/// Useful for checking coverage and interpolation in isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlitShader;

impl FragmentShader for UnlitShader {
    fn shade(&self, fragment: &Fragment, material: Option<&Material>) -> Option<ColorRGB> {
        let color = match material {
            Some(m) if m.diffuse_texture.is_some() => m.diffuse(&fragment.uv),
            Some(m) => fragment.color.component_mul(&m.diffuse_color),
            None => fragment.color,
        };
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::colors;
    use crate::scene::texture::Texture;
    use nalgebra::{Vector2, Vector3};
    use std::sync::Arc;

    fn fragment(uv: Vector2<f32>) -> Fragment {
        Fragment {
            x: 0,
            y: 0,
            depth: 0.5,
            view_depth: 1.0,
            color: ColorRGB::new(0.2, 0.4, 0.6),
            uv,
            normal: Vector3::z(),
            tangent: Vector3::zeros(),
            view_direction: Vector3::z(),
        }
    }

    #[test]
    fn samples_texture_when_present() {
        let tex = Texture::checkerboard(2, colors::RED, colors::BLUE);
        let material = Material::default().with_diffuse_texture(Arc::new(tex));
        let c = UnlitShader.shade(&fragment(Vector2::new(0.75, 0.25)), Some(&material));
        assert_eq!(c, Some(colors::BLUE));
    }

    #[test]
    fn falls_back_to_vertex_color() {
        let c = UnlitShader.shade(&fragment(Vector2::zeros()), None);
        assert_eq!(c, Some(ColorRGB::new(0.2, 0.4, 0.6)));
    }
}
