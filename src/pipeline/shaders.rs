pub mod phong;
pub mod unlit;

use serde::Deserialize;

/// What the lit pipeline outputs per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ShadingMode {
    /// Cosine between the normal and the light, as grayscale.
    ObservedArea,
    /// Lambert term only.
    Diffuse,
    /// Phong term only.
    Specular,
    /// Ambient + Lambert + Phong, scaled by radiance.
    #[default]
    Combined,
    /// Depth buffer remapped to grayscale.
    DepthBuffer,
    /// Flat fill of every triangle's bounding box.
    BoundingBox,
}

impl ShadingMode {
    /// Next lit mode: ObservedArea -> Diffuse -> Specular -> Combined -> ObservedArea.
    /// The visualization modes continue at ObservedArea.
    pub fn cycle(self) -> Self {
        match self {
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
            ShadingMode::Combined | ShadingMode::DepthBuffer | ShadingMode::BoundingBox => {
                ShadingMode::ObservedArea
            }
        }
    }

    pub fn is_lit(self) -> bool {
        !matches!(self, ShadingMode::DepthBuffer | ShadingMode::BoundingBox)
    }

    pub fn label(self) -> &'static str {
        match self {
            ShadingMode::ObservedArea => "Observed Area",
            ShadingMode::Diffuse => "Diffuse",
            ShadingMode::Specular => "Specular",
            ShadingMode::Combined => "Combined",
            ShadingMode::DepthBuffer => "Depth Buffer",
            ShadingMode::BoundingBox => "Bounding Box",
        }
    }
}
