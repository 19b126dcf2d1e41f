use nalgebra::Vector3;

/// Linear RGB color, nominally in [0, 1] per channel.
/// Lighting may push channels above 1; see [`max_to_one`].
pub type ColorRGB = Vector3<f32>;

/// Named colors.
pub mod colors {
    use super::ColorRGB;

    pub const BLACK: ColorRGB = ColorRGB::new(0.0, 0.0, 0.0);
    pub const WHITE: ColorRGB = ColorRGB::new(1.0, 1.0, 1.0);
    pub const GRAY: ColorRGB = ColorRGB::new(0.5, 0.5, 0.5);
    pub const RED: ColorRGB = ColorRGB::new(1.0, 0.0, 0.0);
    pub const GREEN: ColorRGB = ColorRGB::new(0.0, 1.0, 0.0);
    pub const BLUE: ColorRGB = ColorRGB::new(0.0, 0.0, 1.0);
}

/// Clamps every channel to [0, 1].
#[inline]
pub fn saturate(color: ColorRGB) -> ColorRGB {
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Highlight-preserving normalization: if any channel exceeds 1, divides the whole
/// color by its largest channel so the hue ratios survive.
#[inline]
pub fn max_to_one(color: ColorRGB) -> ColorRGB {
    let max_value = color.x.max(color.y).max(color.z);
    if max_value > 1.0 {
        color / max_value
    } else {
        color
    }
}

/// Linear blend between two colors.
#[inline]
pub fn lerp(a: ColorRGB, b: ColorRGB, factor: f32) -> ColorRGB {
    a * (1.0 - factor) + b * factor
}

/// Normalizes with [`max_to_one`], then quantizes to 8 bits per channel.
/// Negative channels become 0.
#[inline]
pub fn to_rgb8(color: ColorRGB) -> [u8; 3] {
    let c = saturate(max_to_one(color));
    [
        (c.x * 255.0) as u8,
        (c.y * 255.0) as u8,
        (c.z * 255.0) as u8,
    ]
}

/// Packs 8-bit channels as 0xFFRRGGBB.
#[inline]
pub fn pack_rgb8([r, g, b]: [u8; 3]) -> u32 {
    (255 << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits a packed 0xFFRRGGBB value back into 8-bit channels.
#[inline]
pub fn unpack_rgb8(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}

/// Converts a color to its packed buffer representation.
#[inline]
pub fn to_packed(color: ColorRGB) -> u32 {
    pack_rgb8(to_rgb8(color))
}
