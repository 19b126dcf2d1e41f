pub mod interpolation;
pub mod transform;

use nalgebra::Vector3;

/// Linearly remaps `value` from [input_min, input_max] to [output_min, output_max],
/// clamping to the output bounds outside the input range.
#[inline]
pub fn remap(value: f32, input_min: f32, input_max: f32, output_min: f32, output_max: f32) -> f32 {
    if value <= input_min {
        return output_min;
    }
    if value >= input_max {
        return output_max;
    }
    output_min + (value - input_min) * (output_max - output_min) / (input_max - input_min)
}

/// Reflects the incident vector `v` about the normal `n`: `v - 2 (v . n) n`.
#[inline]
pub fn reflect(v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    v - n * (2.0 * v.dot(n))
}
