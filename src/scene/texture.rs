use crate::core::color::ColorRGB;
use crate::error::{RenderError, Result};
use image::RgbImage;
use log::info;
use std::path::Path;

/// Represents a 2D texture map, decoded to [0, 1] RGB texels.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    texels: Vec<ColorRGB>,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| RenderError::Texture {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let texture = Self::from_image(&img.to_rgb8());
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    pub fn from_image(img: &RgbImage) -> Self {
        let texels = img
            .pixels()
            .map(|p| {
                ColorRGB::new(
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                )
            })
            .collect();

        Self {
            width: img.width(),
            height: img.height(),
            texels,
        }
    }

    /// A single-texel texture.
    pub fn solid(color: ColorRGB) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// `cells` x `cells` checkerboard alternating between `a` (top-left) and `b`,
    /// one texel per cell.
    pub fn checkerboard(cells: u32, a: ColorRGB, b: ColorRGB) -> Self {
        let cells = cells.max(1);
        let texels = (0..cells)
            .flat_map(|y| (0..cells).map(move |x| if (x + y) % 2 == 0 { a } else { b }))
            .collect();

        Self {
            width: cells,
            height: cells,
            texels,
        }
    }

    /// Nearest-texel lookup. UV is clamped to [0, 1] (no wrapping); the origin is
    /// the top-left texel. An empty texture samples as black.
    pub fn sample(&self, u: f32, v: f32) -> ColorRGB {
        if self.texels.is_empty() {
            return ColorRGB::zeros();
        }
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.texels[(y * self.width + x) as usize]
    }
}
