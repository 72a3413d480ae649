//! Scanline rasterization of projected triangles.
//!
//! All drawing takes [`CanvasPoint`]s that have already been projected.
//! Lines and spans step `max(|dx|, |dy|) + 1` times, interpolating every
//! attribute (reciprocal depth and texel coordinates included) and rounding
//! to the nearest pixel. Filled triangles are split at the middle vertex
//! into a flat-bottom and a flat-top half. Rows and samples that cannot
//! reach the buffer are skipped before they are interpolated, so a vertex
//! projected far off screen costs no more than the pixels it covers.

use std::ops::RangeInclusive;

use lumen_core::Texture;
use lumen_math::CanvasPoint;

use crate::framebuffer::FrameBuffer;

/// How a filled triangle gets its colour.
#[derive(Clone, Copy, Debug)]
pub enum Fill<'a> {
    /// One packed colour for every pixel.
    Flat(u32),
    /// Sample the texture at each pixel's interpolated texel coordinates.
    Textured(&'a Texture),
}

impl Fill<'_> {
    #[inline]
    fn colour_at(&self, point: &CanvasPoint) -> u32 {
        match self {
            Fill::Flat(colour) => *colour,
            Fill::Textured(texture) => texture.texel(point.texture),
        }
    }
}

/// Number of evenly spaced samples on the line from `from` to `to`.
#[inline]
fn step_count(from: &CanvasPoint, to: &CanvasPoint) -> usize {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    dx.abs().max(dy.abs()).round() as usize + 1
}

/// Parameter of sample `i` out of `steps`, ends included.
#[inline]
fn sample_t(i: usize, steps: usize) -> f32 {
    if steps > 1 {
        i as f32 / (steps - 1) as f32
    } else {
        0.0
    }
}

/// Narrow `(lo, hi)` to the parameters `t` where `start + delta * t` lies
/// within one pixel of `[0, size)`.
fn axis_interval(start: f32, delta: f32, size: u32, (lo, hi): (f64, f64)) -> Option<(f64, f64)> {
    let (start, delta) = (start as f64, delta as f64);
    let (min, max) = (-1.0, size as f64);
    if delta == 0.0 {
        return (min..=max).contains(&start).then_some((lo, hi));
    }

    let a = (min - start) / delta;
    let b = (max - start) / delta;
    let (lo, hi) = (lo.max(a.min(b)), hi.min(a.max(b)));
    (lo <= hi).then_some((lo, hi))
}

/// Sample indices whose parameter falls inside `interval`.
fn index_range(interval: Option<(f64, f64)>, steps: usize) -> RangeInclusive<usize> {
    let last = steps.saturating_sub(1);
    match interval {
        Some((lo, hi)) => {
            let first = (lo * last as f64).floor().max(0.0) as usize;
            let end = ((hi * last as f64).ceil() as usize).min(last);
            first..=end
        }
        None => RangeInclusive::new(1, 0),
    }
}

/// Points along the line from `from` to `to`, both ends included.
pub fn line_points(from: CanvasPoint, to: CanvasPoint) -> impl Iterator<Item = CanvasPoint> {
    let steps = step_count(&from, &to);
    (0..steps).map(move |i| from.lerp(&to, sample_t(i, steps)))
}

/// The subset of [`line_points`] that can land inside a `width` x `height`
/// buffer. Samples keep their parameter along the whole line.
fn visible_points(
    from: CanvasPoint,
    to: CanvasPoint,
    width: u32,
    height: u32,
) -> impl Iterator<Item = CanvasPoint> {
    let steps = step_count(&from, &to);
    let interval = axis_interval(from.x, to.x - from.x, width, (0.0, 1.0))
        .and_then(|t| axis_interval(from.y, to.y - from.y, height, t));

    index_range(interval, steps).map(move |i| from.lerp(&to, sample_t(i, steps)))
}

/// Draw a line without depth testing.
pub fn draw_line(fb: &mut FrameBuffer, from: CanvasPoint, to: CanvasPoint, colour: u32) {
    for point in visible_points(from, to, fb.width(), fb.height()) {
        let (x, y) = point.pixel();
        fb.set_pixel(x, y, colour);
    }
}

/// Draw the three edges of a triangle without depth testing.
pub fn draw_stroked_triangle(fb: &mut FrameBuffer, points: [CanvasPoint; 3], colour: u32) {
    let [a, b, c] = points;
    draw_line(fb, a, b, colour);
    draw_line(fb, b, c, colour);
    draw_line(fb, c, a, colour);
}

/// Draw a depth-tested span between two points.
fn draw_span(fb: &mut FrameBuffer, from: CanvasPoint, to: CanvasPoint, fill: Fill<'_>) {
    for point in visible_points(from, to, fb.width(), fb.height()) {
        let (x, y) = point.pixel();
        fb.set_pixel_with_depth(x, y, point.depth, fill.colour_at(&point));
    }
}

/// Fill a triangle whose `base_a` and `base_b` share a scanline.
fn fill_flat(
    fb: &mut FrameBuffer,
    apex: CanvasPoint,
    base_a: CanvasPoint,
    base_b: CanvasPoint,
    fill: Fill<'_>,
) {
    let rows = (base_a.y - apex.y).abs().round() as usize;
    if rows == 0 {
        draw_span(fb, base_a, base_b, fill);
        return;
    }

    // Rows off screen are skipped without walking their spans
    let visible = axis_interval(apex.y, base_a.y - apex.y, fb.height(), (0.0, 1.0));
    for row in index_range(visible, rows + 1) {
        let t = row as f32 / rows as f32;
        let left = apex.lerp(&base_a, t);
        let right = apex.lerp(&base_b, t);
        draw_span(fb, left, right, fill);
    }
}

/// Fill a triangle with depth testing.
///
/// Vertex screen positions are snapped to whole pixels first.
pub fn draw_filled_triangle(fb: &mut FrameBuffer, points: [CanvasPoint; 3], fill: Fill<'_>) {
    let mut sorted = points.map(CanvasPoint::snapped);
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    let [top, middle, bottom] = sorted;

    if top.y == bottom.y {
        // Degenerate: a single horizontal span
        draw_span(fb, top, bottom, fill);
    } else if top.y == middle.y {
        fill_flat(fb, bottom, top, middle, fill);
    } else if middle.y == bottom.y {
        fill_flat(fb, top, middle, bottom, fill);
    } else {
        let t = (middle.y - top.y) / (bottom.y - top.y);
        let mut split = top.lerp(&bottom, t);
        split.y = middle.y;

        fill_flat(fb, top, middle, split, fill);
        fill_flat(fb, bottom, middle, split, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec2;

    const RED: u32 = 0xFFFF_0000;
    const BLUE: u32 = 0xFF00_00FF;

    fn pt(x: f32, y: f32, depth: f32) -> CanvasPoint {
        CanvasPoint::new(x, y, depth)
    }

    fn count(fb: &FrameBuffer, colour: u32) -> usize {
        fb.pixels().iter().filter(|&&p| p == colour).count()
    }

    #[test]
    fn test_line_step_count_and_endpoints() {
        let points: Vec<_> = line_points(pt(0.0, 0.0, 1.0), pt(4.0, 2.0, 0.5)).collect();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].pixel(), (0, 0));
        assert_eq!(points[4].pixel(), (4, 2));
        assert!((points[4].depth - 0.5).abs() < 1e-6);
        assert!((points[2].depth - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_single_point_line() {
        let points: Vec<_> = line_points(pt(3.0, 3.0, 1.0), pt(3.0, 3.0, 1.0)).collect();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_line_ignores_depth() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.set_pixel_with_depth(2, 0, 100.0, BLUE);
        draw_line(&mut fb, pt(0.0, 0.0, 0.1), pt(7.0, 0.0, 0.1), RED);
        assert_eq!(fb.pixel(2, 0), Some(RED));
        assert_eq!(count(&fb, RED), 8);
    }

    #[test]
    fn test_stroked_triangle_touches_corners() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_stroked_triangle(
            &mut fb,
            [pt(1.0, 1.0, 1.0), pt(8.0, 1.0, 1.0), pt(1.0, 8.0, 1.0)],
            RED,
        );
        for (x, y) in [(1, 1), (8, 1), (1, 8), (4, 1), (1, 4)] {
            assert_eq!(fb.pixel(x, y), Some(RED), "({x}, {y})");
        }
        // Interior untouched
        assert_ne!(fb.pixel(3, 3), Some(RED));
    }

    #[test]
    fn test_filled_right_triangle_coverage() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_filled_triangle(
            &mut fb,
            [pt(0.0, 0.0, 1.0), pt(4.0, 0.0, 1.0), pt(0.0, 4.0, 1.0)],
            Fill::Flat(RED),
        );
        // Rows 0..=4 with widths 5, 4, 3, 2, 1
        assert_eq!(count(&fb, RED), 15);
        assert_eq!(fb.pixel(5, 0), Some(0xFF00_0000));
    }

    #[test]
    fn test_general_triangle_is_split() {
        let mut fb = FrameBuffer::new(20, 20);
        draw_filled_triangle(
            &mut fb,
            [pt(10.0, 2.0, 1.0), pt(2.0, 9.0, 1.0), pt(15.0, 17.0, 1.0)],
            Fill::Flat(RED),
        );
        for (x, y) in [(10, 2), (2, 9), (15, 17), (9, 10)] {
            assert_eq!(fb.pixel(x, y), Some(RED), "({x}, {y})");
        }
        assert_ne!(fb.pixel(18, 3), Some(RED));
    }

    #[test]
    fn test_vertices_are_snapped() {
        let mut a = FrameBuffer::new(10, 10);
        let mut b = FrameBuffer::new(10, 10);
        draw_filled_triangle(
            &mut a,
            [pt(1.2, 1.4, 1.0), pt(7.8, 1.1, 1.0), pt(3.6, 6.7, 1.0)],
            Fill::Flat(RED),
        );
        draw_filled_triangle(
            &mut b,
            [pt(1.0, 1.0, 1.0), pt(8.0, 1.0, 1.0), pt(4.0, 7.0, 1.0)],
            Fill::Flat(RED),
        );
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_depth_test_is_order_independent() {
        let near = [pt(0.0, 0.0, 0.5), pt(9.0, 0.0, 0.5), pt(0.0, 9.0, 0.5)];
        let far = [pt(0.0, 0.0, 0.25), pt(9.0, 0.0, 0.25), pt(9.0, 9.0, 0.25)];

        let mut first = FrameBuffer::new(10, 10);
        draw_filled_triangle(&mut first, near, Fill::Flat(RED));
        draw_filled_triangle(&mut first, far, Fill::Flat(BLUE));

        let mut second = FrameBuffer::new(10, 10);
        draw_filled_triangle(&mut second, far, Fill::Flat(BLUE));
        draw_filled_triangle(&mut second, near, Fill::Flat(RED));

        assert_eq!(first.pixels(), second.pixels());
        // Overlap region shows the nearer triangle
        assert_eq!(first.pixel(3, 1), Some(RED));
        assert_eq!(first.pixel(8, 6), Some(BLUE));
    }

    #[test]
    fn test_textured_fill_samples_texels() {
        // Left column red, right column blue
        let texture = Texture::new(2, 1, vec![RED, BLUE], "stripes").unwrap();
        let mut fb = FrameBuffer::new(10, 10);
        draw_filled_triangle(
            &mut fb,
            [
                pt(0.0, 0.0, 1.0).with_texture(Vec2::new(0.0, 0.0)),
                pt(9.0, 0.0, 1.0).with_texture(Vec2::new(1.0, 0.0)),
                pt(0.0, 9.0, 1.0).with_texture(Vec2::new(0.0, 0.0)),
            ],
            Fill::Textured(&texture),
        );
        assert_eq!(fb.pixel(0, 0), Some(RED));
        assert_eq!(fb.pixel(9, 0), Some(BLUE));
    }

    #[test]
    fn test_horizontal_degenerate_triangle() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_filled_triangle(
            &mut fb,
            [pt(5.0, 3.0, 1.0), pt(1.0, 3.0, 1.0), pt(8.0, 3.0, 1.0)],
            Fill::Flat(RED),
        );
        assert_eq!(count(&fb, RED), 8);
    }

    #[test]
    fn test_near_plane_triangle_fills_screen() {
        // Corners just in front of the camera project far outside the buffer
        let mut fb = FrameBuffer::new(64, 48);
        draw_filled_triangle(
            &mut fb,
            [
                pt(-2.0e5, 2.0e5, 1000.0),
                pt(2.0e5, 2.0e5, 1000.0),
                pt(32.0, -2.0e5, 1000.0),
            ],
            Fill::Flat(RED),
        );
        assert_eq!(count(&fb, RED), 64 * 48);
        assert_eq!(fb.depth_at(0, 0), Some(1000.0));

        draw_line(&mut fb, pt(-3.0e5, 10.0, 1.0), pt(3.0e5, 10.0, 1.0), BLUE);
        assert_eq!(count(&fb, BLUE), 64);
    }

    #[test]
    fn test_partly_off_screen_matches_larger_buffer() {
        let points = [
            pt(-30.0, -20.0, 0.2).with_texture(Vec2::new(0.0, 0.0)),
            pt(150.0, 5.0, 0.8).with_texture(Vec2::new(1.0, 0.0)),
            pt(4.0, 120.0, 0.5).with_texture(Vec2::new(0.0, 1.0)),
        ];
        let texture = Texture::new(2, 1, vec![RED, BLUE], "stripes").unwrap();

        let mut small = FrameBuffer::new(12, 10);
        let mut large = FrameBuffer::new(200, 200);
        for fb in [&mut small, &mut large] {
            draw_filled_triangle(fb, points, Fill::Textured(&texture));
            draw_line(fb, pt(-40.0, 2.0, 1.0), pt(300.0, 9.0, 1.0), 0xFF00_FF00);
        }

        for y in 0..10 {
            for x in 0..12 {
                assert_eq!(small.pixel(x, y), large.pixel(x, y), "({x}, {y})");
                assert_eq!(small.depth_at(x, y), large.depth_at(x, y), "({x}, {y})");
            }
        }
    }
}
