use crate::core::color::unpack_rgb8;
use crate::core::framebuffer::FrameBuffer;
use crate::error::{RenderError, Result};
use image::{ImageBuffer, Rgb};
use log::info;
use std::path::Path;

/// Converts the packed color buffer to an RGB image.
pub fn framebuffer_to_image(framebuffer: &FrameBuffer) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let width = framebuffer.width;
    ImageBuffer::from_fn(framebuffer.width as u32, framebuffer.height as u32, |x, y| {
        let idx = (y as usize) * width + (x as usize);
        Rgb(unpack_rgb8(framebuffer.color_buffer[idx]))
    })
}

/// Writes the color buffer to `path`. The format follows the extension; `.bmp`
/// gives an uncompressed bitmap.
pub fn save_buffer_to_image(framebuffer: &FrameBuffer, path: &Path) -> Result<()> {
    framebuffer_to_image(framebuffer)
        .save(path)
        .map_err(|source| RenderError::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "Saved {}x{} color buffer to {:?}",
        framebuffer.width, framebuffer.height, path
    );
    Ok(())
}
