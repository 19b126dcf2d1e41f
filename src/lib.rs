pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;

pub use error::{RenderError, Result};
