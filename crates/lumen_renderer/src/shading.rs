//! Material colour resolution for ray-traced hits.
//!
//! Mirror and refractive surfaces recurse through [`Shader::resolve_colour`]
//! with a remaining-depth counter; a reflected ray that misses, lands on a
//! surface that ignores lighting, or runs out of depth contributes black.

use lumen_core::{Colour, MaterialKind, Scene};
use lumen_math::{interpolate, reflect, weights_or_flat, Camera, Ray, Vec3};

use crate::intersect::{closest_intersection, Intersection};
use crate::lighting::{brightness, LightingMode, LightingParams};

/// Blue tint blended into mirror reflections.
const MIRROR_TINT: Colour = Vec3::new(0.0, 0.0, 0.1);

/// Share of the reflected colour kept by a mirror.
const MIRROR_KEEP: f32 = 0.9;

/// Read-only view of everything needed to colour a hit.
#[derive(Clone, Copy)]
pub struct Shader<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    mode: LightingMode,
    params: &'a LightingParams,
}

impl<'a> Shader<'a> {
    pub fn new(
        scene: &'a Scene,
        camera: &'a Camera,
        mode: LightingMode,
        params: &'a LightingParams,
    ) -> Self {
        Self {
            scene,
            camera,
            mode,
            params,
        }
    }

    /// Lighting brightness at a hit.
    pub fn brightness(&self, hit: &Intersection) -> f32 {
        brightness(self.mode, self.scene, self.camera.position, hit, self.params)
    }

    /// Final colour of a primary hit: the material colour, scaled by
    /// brightness when the material receives light.
    pub fn shade(&self, hit: &Intersection, max_depth: u32) -> Colour {
        let colour = self.resolve_colour(hit, max_depth);
        if self.scene.triangle(hit.triangle_index).material.receives_light {
            colour * self.brightness(hit)
        } else {
            colour
        }
    }

    /// Unlit colour of the material at a hit.
    pub fn resolve_colour(&self, hit: &Intersection, depth: u32) -> Colour {
        let triangle = self.scene.triangle(hit.triangle_index);

        match &triangle.material.kind {
            MaterialKind::Uniform(colour) => *colour,
            MaterialKind::Textured(texture) => {
                let weights = weights_or_flat(triangle.positions(), hit.point);
                texture.sample(interpolate(weights, triangle.texture_coords()))
            }
            MaterialKind::Mirror => self
                .reflected(hit, depth)
                .map(|(colour, light)| (colour * MIRROR_KEEP + MIRROR_TINT) * light)
                .unwrap_or(Colour::ZERO),
            // Transmission is not modelled; refractive surfaces reflect untinted.
            MaterialKind::Refractive { .. } => self
                .reflected(hit, depth)
                .map(|(colour, light)| colour * light)
                .unwrap_or(Colour::ZERO),
        }
    }

    /// Colour and brightness seen in the reflection at `hit`.
    fn reflected(&self, hit: &Intersection, depth: u32) -> Option<(Colour, f32)> {
        if depth == 0 {
            return None;
        }

        let triangle = self.scene.triangle(hit.triangle_index);
        let incident = (hit.point - self.camera.position).normalize_or_zero();
        let ray = Ray::new(hit.point, reflect(incident, triangle.normal));

        let next = closest_intersection(self.scene.triangles(), &ray, Some(hit.triangle_index));
        if !next.is_hit() {
            return None;
        }
        if !self.scene.triangle(next.triangle_index).material.receives_light {
            return None;
        }

        Some((self.resolve_colour(&next, depth - 1), self.brightness(&next)))
    }
}
