use crate::core::color::{ColorRGB, colors};
use nalgebra::Vector3;

/// A light source that is infinitely far away (e.g., Sun). Rays are parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Direction the light travels, normalized.
    pub direction: Vector3<f32>,
    pub color: ColorRGB,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self::new_directional(Vector3::new(0.577, -0.577, 0.577), colors::WHITE, 1.0)
    }
}

impl Light {
    /// Creates a directional light. A zero direction falls back to straight down.
    pub fn new_directional(direction: Vector3<f32>, color: ColorRGB, intensity: f32) -> Self {
        Self {
            direction: direction
                .try_normalize(1e-6)
                .unwrap_or_else(|| -Vector3::y()),
            color,
            intensity,
        }
    }

    /// Calculates the direction vector FROM the surface TO the light source.
    pub fn direction_to_light(&self) -> Vector3<f32> {
        -self.direction
    }

    /// Color times intensity.
    pub fn radiance(&self) -> ColorRGB {
        self.color * self.intensity
    }

    /// Cosine between the surface normal and the direction to the light. Negative
    /// when the surface faces away.
    pub fn observed_area(&self, normal: &Vector3<f32>) -> f32 {
        normal.dot(&self.direction_to_light())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let light = Light::new_directional(Vector3::new(0.0, -3.0, 4.0), colors::WHITE, 2.0);
        assert!((light.direction.norm() - 1.0).abs() < 1e-6);
        assert_eq!(light.radiance(), ColorRGB::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn observed_area_sign_follows_facing() {
        let light = Light::new_directional(-Vector3::z(), colors::WHITE, 1.0);
        assert!((light.observed_area(&Vector3::z()) - 1.0).abs() < 1e-6);
        assert!(light.observed_area(&-Vector3::z()) < 0.0);
    }
}
