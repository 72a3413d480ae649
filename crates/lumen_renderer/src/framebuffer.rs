//! Pixel and depth buffers shared by every render mode.
//!
//! Colours are stored packed as `0xFF_RR_GG_BB`. The depth buffer holds
//! reciprocal camera-space depth, so it clears to zero (infinitely far) and
//! a write wins when its value is strictly greater than the stored one.

use std::path::Path;

use lumen_core::{pack_colour, Colour};
use lumen_math::Viewport;
use thiserror::Error;

/// Errors raised when exporting or sizing a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Framebuffer is {buffer_width}x{buffer_height} but viewport is {viewport_width}x{viewport_height}")]
    ViewportMismatch {
        buffer_width: u32,
        buffer_height: u32,
        viewport_width: u32,
        viewport_height: u32,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Packed colour buffer with a matching reciprocal-depth buffer.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    /// Create a black buffer with an empty depth buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            pixels: vec![pack_colour(Colour::ZERO); len],
            depth: vec![0.0; len],
        }
    }

    /// Create a buffer matching a viewport.
    pub fn for_viewport(viewport: &Viewport) -> Self {
        Self::new(viewport.width, viewport.height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed pixels in row-major order.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Fill with `colour` and reset every depth to zero.
    pub fn clear(&mut self, colour: Colour) {
        self.pixels.fill(pack_colour(colour));
        self.depth.fill(0.0);
    }

    /// Error unless the buffer has the viewport's dimensions.
    pub fn check_viewport(&self, viewport: &Viewport) -> RenderResult<()> {
        if self.width == viewport.width && self.height == viewport.height {
            return Ok(());
        }
        Err(RenderError::ViewportMismatch {
            buffer_width: self.width,
            buffer_height: self.height,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
        })
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Write a pixel unconditionally. Off-screen writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, colour: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = colour;
        }
    }

    /// Write a pixel if `depth` (reciprocal) is nearer than the stored value.
    ///
    /// Returns whether the write was accepted.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, colour: u32) -> bool {
        match self.index(x, y) {
            Some(i) if depth > self.depth[i] => {
                self.depth[i] = depth;
                self.pixels[i] = colour;
                true
            }
            _ => false,
        }
    }

    /// Packed colour at `(x, y)`, if on screen.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Stored reciprocal depth at `(x, y)`, if on screen.
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Copy a full-width block of rows starting at `y`.
    pub(crate) fn write_rows(&mut self, y: u32, pixels: &[u32], depth: &[f32]) {
        let start = (y * self.width) as usize;
        let end = (start + pixels.len()).min(self.pixels.len());
        self.pixels[start..end].copy_from_slice(&pixels[..end - start]);
        self.depth[start..end].copy_from_slice(&depth[..end - start]);
    }

    /// Convert to an 8-bit RGBA image.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let packed = self.pixels[(y * self.width + x) as usize];
            let [_, r, g, b] = packed.to_be_bytes();
            image::Rgba([r, g, b, 255])
        })
    }

    /// Save as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.to_rgba_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black_and_far() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 12);
        assert_eq!(fb.pixel(0, 0), Some(0xFF00_0000));
        assert_eq!(fb.depth_at(3, 2), Some(0.0));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(-1, 0, 0xFFFF_FFFF);
        fb.set_pixel(2, 0, 0xFFFF_FFFF);
        assert!(!fb.set_pixel_with_depth(0, 5, 1.0, 0xFFFF_FFFF));
        assert!(fb.pixels().iter().all(|&p| p == 0xFF00_0000));
        assert_eq!(fb.pixel(2, 0), None);
    }

    #[test]
    fn test_depth_write_keeps_nearest() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(fb.set_pixel_with_depth(1, 1, 0.25, 0xFF11_1111));
        assert!(fb.set_pixel_with_depth(1, 1, 0.5, 0xFF22_2222));
        assert!(!fb.set_pixel_with_depth(1, 1, 0.3, 0xFF33_3333));
        // Equal depth does not overwrite
        assert!(!fb.set_pixel_with_depth(1, 1, 0.5, 0xFF44_4444));

        assert_eq!(fb.pixel(1, 1), Some(0xFF22_2222));
        assert_eq!(fb.depth_at(1, 1), Some(0.5));
    }

    #[test]
    fn test_clear_resets_depth() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel_with_depth(0, 0, 0.9, 0xFFFF_FFFF);
        fb.clear(Colour::new(1.0, 0.0, 0.0));

        assert_eq!(fb.pixel(0, 0), Some(0xFFFF_0000));
        assert_eq!(fb.depth_at(0, 0), Some(0.0));
    }

    #[test]
    fn test_viewport_check() {
        let fb = FrameBuffer::new(8, 6);
        assert!(fb.check_viewport(&Viewport::new(8, 6, 1.0)).is_ok());
        assert!(matches!(
            fb.check_viewport(&Viewport::new(6, 8, 1.0)),
            Err(RenderError::ViewportMismatch { .. })
        ));
    }

    #[test]
    fn test_rgba_export() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.set_pixel(1, 0, 0xFF10_2030);
        let image = fb.to_rgba_image();

        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0x10, 0x20, 0x30, 255]);
    }
}
