use std::path::PathBuf;
use thiserror::Error;

/// Failures outside the render loop: reading configuration, loading assets and
/// writing the output image. Rendering itself never fails.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read config '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load texture '{path}'")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load OBJ '{path}'")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh '{0}' has no triangles")]
    EmptyMesh(String),

    #[error("failed to save image '{path}'")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
