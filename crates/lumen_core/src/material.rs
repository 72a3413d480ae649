//! Surface materials.
//!
//! The set of material kinds is closed; the renderer resolves colours with a
//! single match over [`MaterialKind`].

use std::sync::Arc;

use lumen_math::Vec3;

use crate::colour::{Colour, DEFAULT_GREY};
use crate::texture::Texture;

/// Flat colour used for reflective materials when rasterizing.
pub const REFLECTIVE_PREVIEW: Colour = Vec3::new(0.75, 0.8, 0.9);

/// How a material produces its colour.
#[derive(Clone, Debug)]
pub enum MaterialKind {
    /// Constant colour.
    Uniform(Colour),
    /// Colour sampled from a texture with interpolated UVs.
    Textured(Arc<Texture>),
    /// Perfect reflector, tinted slightly blue.
    Mirror,
    /// Reflects like a mirror. `index` is the refractive index, reserved
    /// for a transmission model.
    Refractive { index: f32 },
}

/// A named material shared by any number of triangles.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name (from the material library)
    pub name: String,

    /// Colour model
    pub kind: MaterialKind,

    /// Whether lighting and shadows are applied to this surface
    pub receives_light: bool,
}

impl Material {
    /// Create a constant-colour material.
    pub fn uniform(name: impl Into<String>, colour: Colour) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Uniform(colour),
            receives_light: true,
        }
    }

    /// Create a textured material.
    pub fn textured(name: impl Into<String>, texture: Arc<Texture>) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Textured(texture),
            receives_light: true,
        }
    }

    /// Create a mirror material.
    pub fn mirror(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Mirror,
            receives_light: false,
        }
    }

    /// Create a refractive material with the given refractive index.
    pub fn refractive(name: impl Into<String>, index: f32) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Refractive { index },
            receives_light: false,
        }
    }

    /// Override whether lighting applies to this material.
    pub fn with_receives_light(mut self, receives_light: bool) -> Self {
        self.receives_light = receives_light;
        self
    }

    /// Check if this material reflects rays into the scene.
    pub fn is_reflective(&self) -> bool {
        matches!(self.kind, MaterialKind::Mirror | MaterialKind::Refractive { .. })
    }

    /// Colour used when the material is drawn without ray tracing.
    pub fn flat_colour(&self) -> Colour {
        match &self.kind {
            MaterialKind::Uniform(colour) => *colour,
            MaterialKind::Textured(texture) => texture.sample(lumen_math::Vec2::splat(0.5)),
            MaterialKind::Mirror | MaterialKind::Refractive { .. } => REFLECTIVE_PREVIEW,
        }
    }
}

impl Default for Material {
    /// Grey material substituted for unresolved material names.
    fn default() -> Self {
        Self::uniform("default", DEFAULT_GREY)
    }
}
