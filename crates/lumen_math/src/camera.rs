//! Pinhole camera and screen projection.
//!
//! The camera looks down its local -Z axis. `orientation` maps world-space
//! offsets into camera space; its rows are the camera's right, up and
//! backward axes.

use glam::{Mat3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::Ray;

/// Points closer to the camera plane than this cannot be projected.
pub const NEAR_EPSILON: f32 = 1e-6;

/// Screen dimensions and the pixels-per-unit scale supplied by the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self { width, height, scale }
    }

    #[inline]
    fn half_extent(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(320, 240, 120.0)
    }
}

/// A projected point on the screen.
///
/// `depth` holds the reciprocal of the camera-space depth, so larger values
/// are nearer and linear interpolation across a scanline stays
/// perspective-correct. `texture` is in texel units when the point belongs
/// to a textured triangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub texture: Vec2,
}

impl CanvasPoint {
    pub fn new(x: f32, y: f32, depth: f32) -> Self {
        Self {
            x,
            y,
            depth,
            texture: Vec2::ZERO,
        }
    }

    pub fn with_texture(mut self, texture: Vec2) -> Self {
        self.texture = texture;
        self
    }

    /// Linearly interpolate every attribute towards `other`.
    #[inline]
    pub fn lerp(&self, other: &CanvasPoint, t: f32) -> CanvasPoint {
        CanvasPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            depth: self.depth + (other.depth - self.depth) * t,
            texture: self.texture.lerp(other.texture, t),
        }
    }

    /// Snap the screen position to the nearest pixel centre.
    pub fn snapped(mut self) -> Self {
        self.x = self.x.round();
        self.y = self.y.round();
        self
    }

    /// The pixel this point lands on.
    #[inline]
    pub fn pixel(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    /// Camera-space depth (distance along the view axis).
    pub fn distance(&self) -> f32 {
        1.0 / self.depth
    }
}

/// Camera position, orientation and focal length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Mat3,
    pub focal_length: f32,
}

impl Camera {
    /// Create a camera at `position` looking down world -Z.
    pub fn new(position: Vec3, focal_length: f32) -> Self {
        Self {
            position,
            orientation: Mat3::IDENTITY,
            focal_length,
        }
    }

    /// Set an explicit orientation matrix.
    pub fn with_orientation(mut self, orientation: Mat3) -> Self {
        self.orientation = orientation;
        self
    }

    /// Transform a world-space point into camera space.
    #[inline]
    pub fn to_camera_space(&self, point: Vec3) -> Vec3 {
        self.orientation * (point - self.position)
    }

    /// Depth of a world-space point along the view axis (positive in front).
    #[inline]
    pub fn depth_of(&self, point: Vec3) -> f32 {
        -self.to_camera_space(point).z
    }

    /// Project a world-space point onto the screen.
    ///
    /// Returns `None` for points on or behind the camera plane, where the
    /// perspective divide is undefined.
    pub fn project(&self, point: Vec3, viewport: &Viewport) -> Option<CanvasPoint> {
        let camera_space = self.to_camera_space(point);
        let depth = -camera_space.z;
        if depth <= NEAR_EPSILON {
            return None;
        }

        let half = viewport.half_extent();
        let x = camera_space.x * viewport.scale;
        let y = camera_space.y * viewport.scale;

        let u = half.x - self.focal_length * (x / camera_space.z);
        let v = half.y + self.focal_length * (y / camera_space.z);
        Some(CanvasPoint::new(u, v, 1.0 / depth))
    }

    /// World-space unit direction of the primary ray through screen
    /// position `(x, y)`. This is the inverse of [`Camera::project`].
    pub fn ray_direction(&self, x: f32, y: f32, viewport: &Viewport) -> Vec3 {
        let half = viewport.half_extent();
        let local = Vec3::new(
            (x - half.x) / viewport.scale,
            (half.y - y) / viewport.scale,
            -self.focal_length,
        );
        (self.orientation.transpose() * local).normalize()
    }

    /// Primary ray through screen position `(x, y)`.
    pub fn primary_ray(&self, x: f32, y: f32, viewport: &Viewport) -> Ray {
        Ray::new(self.position, self.ray_direction(x, y, viewport))
    }

    /// Turn the camera to face `target`, keeping world +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (self.position - target).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }

        let mut right = Vec3::Y.cross(forward);
        if right.length_squared() < NEAR_EPSILON {
            // Looking straight up or down
            right = Vec3::X;
        }
        let right = right.normalize();
        let up = forward.cross(right);

        self.orientation = Mat3::from_cols(right, up, forward).transpose();
    }

    /// Orbit around `centre` by `angle` radians about the vertical axis,
    /// then re-aim at `centre`.
    pub fn orbit(&mut self, angle: f32, centre: Vec3) {
        self.position = rotate_about(self.position, centre, Vec3::new(0.0, angle, 0.0));
        self.look_at(centre);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 4.0), 2.0)
    }
}

/// Rotation matrix for Euler angles (radians), applied X then Y then Z.
pub fn rotation_matrix(euler: Vec3) -> Mat3 {
    Mat3::from_rotation_z(euler.z) * Mat3::from_rotation_y(euler.y) * Mat3::from_rotation_x(euler.x)
}

/// Rotate `point` about `origin` by Euler angles.
pub fn rotate_about(point: Vec3, origin: Vec3, euler: Vec3) -> Vec3 {
    rotation_matrix(euler) * (point - origin) + origin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(320, 240, 100.0)
    }

    #[test]
    fn test_point_on_axis_projects_to_centre() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), 2.0);
        let p = camera.project(Vec3::ZERO, &viewport()).unwrap();

        assert!((p.x - 160.0).abs() < 1e-4);
        assert!((p.y - 120.0).abs() < 1e-4);
        assert!((p.distance() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_axes() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), 2.0);
        let vp = viewport();

        // Right in world is right on screen, up in world is up on screen
        let right = camera.project(Vec3::new(1.0, 0.0, 0.0), &vp).unwrap();
        let up = camera.project(Vec3::new(0.0, 1.0, 0.0), &vp).unwrap();

        // focal * scale * offset / depth = 2 * 100 * 1 / 4 = 50
        assert!((right.x - 210.0).abs() < 1e-3);
        assert!((up.y - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_projection_rejects_camera_plane() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), 2.0);
        assert!(camera.project(Vec3::new(1.0, 1.0, 4.0), &viewport()).is_none());
        assert!(camera.project(Vec3::new(0.0, 0.0, 5.0), &viewport()).is_none());
    }

    #[test]
    fn test_ray_direction_inverts_projection() {
        let mut camera = Camera::new(Vec3::new(1.5, 2.0, 5.0), 2.0);
        camera.look_at(Vec3::ZERO);
        let vp = viewport();

        let world = Vec3::new(0.3, -0.4, 0.2);
        let p = camera.project(world, &vp).unwrap();
        let dir = camera.ray_direction(p.x, p.y, &vp);
        let expected = (world - camera.position).normalize();

        assert!((dir - expected).length() < 1e-4);
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut camera = Camera::new(Vec3::new(3.0, 1.0, 3.0), 2.0);
        camera.look_at(Vec3::ZERO);

        let p = camera.project(Vec3::ZERO, &viewport()).unwrap();
        assert!((p.x - 160.0).abs() < 1e-3);
        assert!((p.y - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), 2.0);
        camera.orbit(0.5, Vec3::ZERO);

        assert!((camera.position.length() - 4.0).abs() < 1e-4);
        assert!((camera.depth_of(Vec3::ZERO) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_canvas_point_lerp() {
        let a = CanvasPoint::new(0.0, 0.0, 1.0).with_texture(Vec2::new(0.0, 10.0));
        let b = CanvasPoint::new(10.0, 4.0, 0.5).with_texture(Vec2::new(10.0, 0.0));
        let mid = a.lerp(&b, 0.5);

        assert_eq!(mid.x, 5.0);
        assert_eq!(mid.y, 2.0);
        assert_eq!(mid.depth, 0.75);
        assert_eq!(mid.texture, Vec2::new(5.0, 5.0));
    }
}
