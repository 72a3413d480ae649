//! Area-ratio barycentric weights.

use std::ops::{Add, Mul};

use glam::Vec3;

/// Triangles with less area than this have no usable barycentric frame.
pub const AREA_EPSILON: f32 = 1e-10;

/// Flat weights used when a triangle is degenerate.
pub const FLAT_WEIGHTS: Vec3 = Vec3::splat(1.0 / 3.0);

/// Area of the triangle `a`, `b`, `c`.
#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(c - a).length() / 2.0
}

/// Barycentric weights of `p` against `vertices`, computed as the area of
/// the sub-triangle opposite each vertex divided by the whole area.
///
/// Returns `None` for zero-area (collinear) triangles.
pub fn area_weights(vertices: [Vec3; 3], p: Vec3) -> Option<Vec3> {
    let [v0, v1, v2] = vertices;
    let whole = triangle_area(v0, v1, v2);
    if whole < AREA_EPSILON {
        return None;
    }

    Some(Vec3::new(
        triangle_area(p, v1, v2) / whole,
        triangle_area(v0, p, v2) / whole,
        triangle_area(v0, v1, p) / whole,
    ))
}

/// Like [`area_weights`], falling back to [`FLAT_WEIGHTS`] for degenerate
/// triangles.
#[inline]
pub fn weights_or_flat(vertices: [Vec3; 3], p: Vec3) -> Vec3 {
    area_weights(vertices, p).unwrap_or(FLAT_WEIGHTS)
}

/// Blend three per-vertex attributes with barycentric weights.
#[inline]
pub fn interpolate<T>(weights: Vec3, values: [T; 3]) -> T
where
    T: Mul<f32, Output = T> + Add<Output = T> + Copy,
{
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const TRI: [Vec3; 3] = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(0.0, 3.0, 0.0),
    ];

    #[test]
    fn test_triangle_area() {
        assert!((triangle_area(TRI[0], TRI[1], TRI[2]) - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_weights_at_vertices() {
        let w = area_weights(TRI, TRI[1]).unwrap();
        assert!((w - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_weights_at_centroid_are_thirds() {
        let centroid = (TRI[0] + TRI[1] + TRI[2]) / 3.0;
        let w = area_weights(TRI, centroid).unwrap();

        for weight in w.to_array() {
            assert!((weight - 1.0 / 3.0).abs() < 1e-5);
        }
        assert!((w.x + w.y + w.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_falls_back_to_flat() {
        let line = [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
        assert!(area_weights(line, Vec3::X).is_none());
        assert_eq!(weights_or_flat(line, Vec3::X), FLAT_WEIGHTS);
    }

    #[test]
    fn test_interpolate_texture_coordinates() {
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let p = Vec3::new(1.5, 0.0, 0.0);
        let uv = interpolate(area_weights(TRI, p).unwrap(), uvs);

        assert!((uv - Vec2::new(0.5, 0.0)).length() < 1e-5);
    }
}
