//! Scalar brightness models for ray-traced hits.
//!
//! Each light contributes a value; [`brightness`] averages the per-light
//! values over the scene's lights and applies the ambient floor afterwards
//! for the modes that use one.

use lumen_core::{Scene, Triangle};
use lumen_math::{interpolate, reflect, weights_or_flat, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::intersect::{closest_intersection, Intersection};

/// Which brightness model the ray tracer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightingMode {
    /// Binary shadow test per light
    #[default]
    Hard,
    /// Inverse-square falloff
    Proximity,
    /// Falloff times angle of incidence
    Incidence,
    /// Incidence plus a specular highlight
    Specular,
    /// Specular with shadows and an ambient floor
    Ambient,
    /// Per-vertex lighting interpolated across the face
    Gouraud,
    /// Per-pixel lighting with interpolated vertex normals
    Phong,
}

impl LightingMode {
    /// Every mode, in menu order.
    pub const ALL: [LightingMode; 7] = [
        LightingMode::Hard,
        LightingMode::Proximity,
        LightingMode::Incidence,
        LightingMode::Specular,
        LightingMode::Ambient,
        LightingMode::Gouraud,
        LightingMode::Phong,
    ];
}

/// Tunable constants for the brightness models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingParams {
    /// Light strength S in `S / (4 pi d^2)`
    pub light_strength: f32,
    /// Floor added by the ambient step
    pub ambient: f32,
    /// Exponent for flat-shaded highlights
    pub specular_exponent: i32,
    /// Exponent for Gouraud and Phong highlights
    pub smooth_specular_exponent: i32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            light_strength: 12.5,
            ambient: 0.2,
            specular_exponent: 128,
            smooth_specular_exponent: 256,
        }
    }
}

/// Whether nothing blocks the segment from `point` to `light`.
///
/// `exclude` is the triangle the point lies on.
pub fn light_visible(triangles: &[Triangle], point: Vec3, light: Vec3, exclude: usize) -> bool {
    let hit = closest_intersection(triangles, &Ray::towards(point, light), Some(exclude));
    hit.distance >= point.distance(light)
}

/// Fraction of lights visible from `point`.
pub fn hard_shadow(scene: &Scene, point: Vec3, exclude: usize) -> f32 {
    let lights = scene.lights();
    let visible = lights
        .iter()
        .filter(|light| light_visible(scene.triangles(), point, light.position, exclude))
        .count();
    visible as f32 / lights.len() as f32
}

/// Inverse-square falloff, clamped to 1.
pub fn proximity(point: Vec3, light: Vec3, strength: f32) -> f32 {
    let distance_squared = point.distance_squared(light);
    (strength / (4.0 * std::f32::consts::PI * distance_squared)).min(1.0)
}

/// Cosine between the surface normal and the direction to the light.
pub fn incidence(point: Vec3, light: Vec3, normal: Vec3) -> f32 {
    (light - point).normalize().dot(normal).max(0.0)
}

/// Specular highlight seen along `view` (unit, eye to point).
pub fn specular(point: Vec3, light: Vec3, normal: Vec3, view: Vec3, exponent: i32) -> f32 {
    let reflected = reflect((point - light).normalize(), normal);
    (-reflected.dot(view)).max(0.0).powi(exponent)
}

/// Add the ambient floor, clamped to 1.
#[inline]
pub fn ambient(intensity: f32, floor: f32) -> f32 {
    (intensity + floor).min(1.0)
}

/// Per-vertex diffuse brightness interpolated with `weights`.
pub fn gouraud(triangle: &Triangle, weights: Vec3, light: Vec3, strength: f32) -> f32 {
    let per_vertex = triangle
        .vertices
        .map(|v| incidence(v.position, light, v.normal) * proximity(v.position, light, strength));
    interpolate(weights, per_vertex)
}

/// Interpolated unit vertex normal, falling back to the face normal when
/// the interpolation cancels out.
pub fn phong_normal(triangle: &Triangle, weights: Vec3) -> Vec3 {
    let normal = interpolate(weights, triangle.vertex_normals()).normalize_or_zero();
    if normal == Vec3::ZERO {
        triangle.normal
    } else {
        normal
    }
}

/// Brightness of a hit under `mode`, seen from `eye`.
///
/// Hard shadows average visibility over the lights, which is the value
/// [`hard_shadow`] returns. Callers must only pass hits (see
/// [`Intersection::is_hit`]).
pub fn brightness(
    mode: LightingMode,
    scene: &Scene,
    eye: Vec3,
    hit: &Intersection,
    params: &LightingParams,
) -> f32 {
    let point = hit.point;
    let index = hit.triangle_index;
    let triangle = scene.triangle(index);
    let view = (point - eye).normalize_or_zero();
    let weights = weights_or_flat(triangle.positions(), point);
    let strength = params.light_strength;

    let per_light = |light: Vec3| -> f32 {
        let visible = || {
            if light_visible(scene.triangles(), point, light, index) {
                1.0
            } else {
                0.0
            }
        };
        let lit = |normal: Vec3, exponent: i32| {
            let diffuse = proximity(point, light, strength) * incidence(point, light, normal);
            (diffuse + specular(point, light, normal, view, exponent)).min(1.0)
        };

        match mode {
            LightingMode::Hard => visible(),
            LightingMode::Proximity => proximity(point, light, strength),
            LightingMode::Incidence => {
                proximity(point, light, strength) * incidence(point, light, triangle.normal)
            }
            LightingMode::Specular => lit(triangle.normal, params.specular_exponent),
            LightingMode::Ambient => lit(triangle.normal, params.specular_exponent) * visible(),
            LightingMode::Gouraud => {
                let highlight = specular(
                    point,
                    light,
                    triangle.normal,
                    view,
                    params.smooth_specular_exponent,
                );
                (gouraud(triangle, weights, light, strength) + highlight).min(1.0) * visible()
            }
            LightingMode::Phong => {
                lit(phong_normal(triangle, weights), params.smooth_specular_exponent) * visible()
            }
        }
    };

    let lights = scene.lights();
    let total: f32 = lights.iter().map(|l| per_light(l.position)).sum();
    let average = total / lights.len() as f32;

    match mode {
        LightingMode::Ambient | LightingMode::Gouraud | LightingMode::Phong => {
            ambient(average, params.ambient)
        }
        _ => average,
    }
}
