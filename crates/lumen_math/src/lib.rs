// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod barycentric;
mod camera;
mod ray;

pub use barycentric::{area_weights, interpolate, triangle_area, weights_or_flat, AREA_EPSILON, FLAT_WEIGHTS};
pub use camera::{rotate_about, rotation_matrix, Camera, CanvasPoint, Viewport, NEAR_EPSILON};
pub use ray::{reflect, Ray};
