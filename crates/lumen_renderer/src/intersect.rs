//! Ray/triangle intersection and closest-hit search.
//!
//! Solves `origin + t*d = v0 + u*e1 + v*e2` in closed form by inverting the
//! 3x3 matrix `[-d, e1, e2]`. A miss is reported with the sentinel distance
//! [`NO_HIT`] rather than a separate type.

use lumen_core::Triangle;
use lumen_math::{Mat3, Ray, Vec3};

/// Distance reported when a ray hits nothing.
pub const NO_HIT: f32 = f32::MAX;

/// Matrices with a smaller determinant are treated as singular (ray parallel
/// to the plane, or a zero-area triangle).
const DETERMINANT_EPSILON: f32 = 1e-12;

/// Record of a ray/triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point of intersection
    pub point: Vec3,
    /// Parameter t where the intersection occurs, or [`NO_HIT`]
    pub distance: f32,
    /// Index of the triangle that was hit; also the triangle secondary rays
    /// leaving this point must exclude. Meaningless on a miss.
    pub triangle_index: usize,
    /// Barycentric coordinates along edge 1 and edge 2
    pub u: f32,
    pub v: f32,
}

impl Intersection {
    /// The "no hit" result.
    pub const MISS: Intersection = Intersection {
        point: Vec3::ZERO,
        distance: NO_HIT,
        triangle_index: 0,
        u: 0.0,
        v: 0.0,
    };

    /// Check whether a triangle was hit.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.distance < NO_HIT
    }

    /// Barycentric weights for vertices 0, 1 and 2.
    pub fn weights(&self) -> Vec3 {
        Vec3::new(1.0 - self.u - self.v, self.u, self.v)
    }
}

/// Intersect a ray with one triangle.
///
/// Accepts when `t > 0`, `0 <= u, v <= 1` and `u + v <= 1`.
pub fn intersect_triangle(ray: &Ray, triangle: &Triangle, triangle_index: usize) -> Intersection {
    let [v0, v1, v2] = triangle.positions();
    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let matrix = Mat3::from_cols(-ray.direction, e1, e2);
    if matrix.determinant().abs() < DETERMINANT_EPSILON {
        return Intersection::MISS;
    }

    let solution = matrix.inverse() * (ray.origin - v0);
    let (t, u, v) = (solution.x, solution.y, solution.z);

    let inside = (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) && u + v <= 1.0;
    if t <= 0.0 || !inside {
        return Intersection::MISS;
    }

    Intersection {
        point: ray.at(t),
        distance: t,
        triangle_index,
        u,
        v,
    }
}

/// Find the nearest triangle along a ray, optionally skipping one index.
///
/// Returns [`Intersection::MISS`] when nothing is hit.
pub fn closest_intersection(
    triangles: &[Triangle],
    ray: &Ray,
    exclude: Option<usize>,
) -> Intersection {
    let mut closest = Intersection::MISS;

    for (index, triangle) in triangles.iter().enumerate() {
        if Some(index) == exclude {
            continue;
        }

        let candidate = intersect_triangle(ray, triangle, index);
        if candidate.distance < closest.distance {
            closest = candidate;
        }
    }

    closest
}
