//! Row-bucket rendering for the ray tracer.
//!
//! Divides the frame into horizontal bands of full-width rows that can be
//! traced independently and in parallel using rayon. Each bucket returns
//! owned pixel and depth vectors which are copied into the framebuffer
//! afterwards, so no locking is needed.

use rayon::prelude::*;

use crate::framebuffer::FrameBuffer;

/// A horizontal band of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// First row of the band
    pub y: u32,
    /// Number of rows in the band
    pub height: u32,
    /// Index of this bucket, top to bottom
    pub index: usize,
}

impl Bucket {
    pub fn new(y: u32, height: u32, index: usize) -> Self {
        Self { y, height, index }
    }

    /// Get the total number of pixels in this bucket for a given width.
    pub fn pixel_count(&self, width: u32) -> u32 {
        width * self.height
    }
}

/// Default bucket height in rows.
pub const DEFAULT_BUCKET_ROWS: u32 = 16;

/// Split `height` rows into bands of at most `rows` rows.
pub fn generate_buckets(height: u32, rows: u32) -> Vec<Bucket> {
    let rows = rows.max(1);
    (0..height)
        .step_by(rows as usize)
        .enumerate()
        .map(|(index, y)| Bucket::new(y, rows.min(height - y), index))
        .collect()
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Packed colours in row-major order
    pub pixels: Vec<u32>,
    /// Reciprocal depths in row-major order
    pub depth: Vec<f32>,
}

/// Render one bucket.
///
/// `trace` returns the packed colour and reciprocal depth for a pixel, or
/// `None` to keep `background` at depth zero.
pub fn render_bucket<F>(bucket: &Bucket, width: u32, background: u32, trace: &F) -> BucketResult
where
    F: Fn(u32, u32) -> Option<(u32, f32)>,
{
    let count = bucket.pixel_count(width) as usize;
    let mut pixels = Vec::with_capacity(count);
    let mut depth = Vec::with_capacity(count);

    for y in bucket.y..bucket.y + bucket.height {
        for x in 0..width {
            let (colour, d) = trace(x, y).unwrap_or((background, 0.0));
            pixels.push(colour);
            depth.push(d);
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
        depth,
    }
}

/// Trace every pixel of `fb`, one bucket at a time.
///
/// With `parallel` set, buckets are distributed over the rayon pool. Both
/// paths produce identical buffers.
pub fn render_buckets<F>(fb: &mut FrameBuffer, rows: u32, background: u32, parallel: bool, trace: F)
where
    F: Fn(u32, u32) -> Option<(u32, f32)> + Sync,
{
    let width = fb.width();
    let buckets = generate_buckets(fb.height(), rows);
    log::debug!(
        "Tracing {} buckets of {} rows ({})",
        buckets.len(),
        rows,
        if parallel { "parallel" } else { "serial" }
    );

    let results: Vec<BucketResult> = if parallel {
        buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, width, background, &trace))
            .collect()
    } else {
        buckets
            .iter()
            .map(|bucket| render_bucket(bucket, width, background, &trace))
            .collect()
    };

    for result in results {
        fb.write_rows(result.bucket.y, &result.pixels, &result.depth);
    }
}
