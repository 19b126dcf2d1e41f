use crate::core::color::{ColorRGB, to_packed, unpack_rgb8};
use rayon::prelude::*;
use std::ops::RangeInclusive;

/// Represents a 2D buffer containing color and depth information.
///
/// Both buffers are row-major with one element per pixel. Parallel rasterization
/// hands out disjoint rows (see [`FrameBuffer::par_rows_mut`]), so a depth test and
/// the write that follows it always happen on memory owned by a single thread.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Packed 0xFFRRGGBB pixels, already normalized and quantized.
    pub color_buffer: Vec<u32>,

    /// Projected depth in [0, 1], smaller is nearer. Cleared to +infinity.
    pub depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![to_packed(ColorRGB::zeros()); size],
            depth_buffer: vec![f32::INFINITY; size],
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Resets every pixel to `color` and every depth to `depth`.
    pub fn clear(&mut self, color: ColorRGB, depth: f32) {
        let packed = to_packed(color);
        self.color_buffer.fill(packed);
        self.depth_buffer.fill(depth);
    }

    /// Returns the 8-bit color stored at (x, y).
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(unpack_rgb8(self.color_buffer[self.index(x, y)]))
    }

    /// Returns the depth stored at (x, y).
    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }

    /// Parallel iterator over mutable views of the rows in `rows`.
    ///
    /// The range must lie within the buffer.
    pub fn par_rows_mut(
        &mut self,
        rows: RangeInclusive<usize>,
    ) -> impl IndexedParallelIterator<Item = FrameRow<'_>> + '_ {
        let width = self.width;
        let first = *rows.start();
        let span = first * width..(*rows.end() + 1) * width;

        self.color_buffer[span.clone()]
            .par_chunks_mut(width)
            .zip(self.depth_buffer[span].par_chunks_mut(width))
            .enumerate()
            .map(move |(i, (color, depth))| FrameRow {
                y: first + i,
                color,
                depth,
            })
    }
}

/// Exclusive access to one row of the color and depth buffers.
pub struct FrameRow<'a> {
    pub y: usize,
    color: &'a mut [u32],
    depth: &'a mut [f32],
}

impl FrameRow<'_> {
    /// Depth test without side effects: strictly nearer than the stored value.
    #[inline(always)]
    pub fn depth_test(&self, x: usize, depth: f32) -> bool {
        depth < self.depth[x]
    }

    /// Stores a shaded fragment's depth and color.
    #[inline(always)]
    pub fn write(&mut self, x: usize, depth: f32, color: ColorRGB) {
        self.depth[x] = depth;
        self.color[x] = to_packed(color);
    }

    /// Writes color only, leaving the depth buffer untouched.
    #[inline(always)]
    pub fn write_color(&mut self, x: usize, color: ColorRGB) {
        self.color[x] = to_packed(color);
    }
}
