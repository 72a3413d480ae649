//! Texture pixel grids for textured materials.
//!
//! Textures arrive already decoded from the scene loader as grids of packed
//! `0xAA_RR_GG_BB` pixels. The rasterizer samples them in texel units; the
//! ray tracer samples them with normalized UV coordinates.

use std::collections::HashMap;
use std::sync::Arc;

use lumen_math::Vec2;
use thiserror::Error;

use crate::colour::{pack_colour, unpack_colour, Colour, OPAQUE};

/// Errors that can occur when building a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Texture {name} has {actual} pixels, expected {width}x{height}")]
    DimensionMismatch {
        name: String,
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("Texture {0} has zero width or height")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A 2D grid of packed pixels.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Packed pixels, row-major order
    pub pixels: Vec<u32>,

    /// Texture name (for debugging)
    pub name: String,
}

impl Texture {
    /// Create a new texture, checking the pixel count against the dimensions.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u32>,
        name: impl Into<String>,
    ) -> TextureResult<Self> {
        let name = name.into();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(name));
        }
        if pixels.len() != (width * height) as usize {
            return Err(TextureError::DimensionMismatch {
                name,
                width,
                height,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            name,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(colour: Colour) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![pack_colour(colour)],
            name: "<solid>".to_string(),
        }
    }

    /// Build a texture from a decoded RGBA image.
    pub fn from_rgba_image(image: &image::RgbaImage, name: impl Into<String>) -> TextureResult<Self> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| OPAQUE | ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Self::new(width, height, pixels, name)
    }

    /// Convert normalized UV coordinates (origin bottom-left) to texel
    /// coordinates (origin top-left).
    pub fn texel_coords(&self, uv: Vec2) -> Vec2 {
        Vec2::new(
            uv.x * (self.width as f32 - 1.0),
            (1.0 - uv.y) * (self.height as f32 - 1.0),
        )
    }

    /// Packed pixel at the texel nearest to `texel`, clamped to the edges.
    pub fn texel(&self, texel: Vec2) -> u32 {
        let x = (texel.x.round().max(0.0) as u32).min(self.width - 1);
        let y = (texel.y.round().max(0.0) as u32).min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Sample the texture at normalized UV coordinates (nearest texel).
    pub fn sample(&self, uv: Vec2) -> Colour {
        unpack_colour(self.texel(self.texel_coords(uv)))
    }
}

/// Named textures shared between materials.
#[derive(Default)]
pub struct TextureLibrary {
    textures: HashMap<String, Arc<Texture>>,
}

impl TextureLibrary {
    /// Create a new empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture under its own name, replacing any previous one.
    pub fn insert(&mut self, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        log::debug!(
            "Registered texture: {} ({}x{})",
            texture.name,
            texture.width,
            texture.height
        );
        self.textures.insert(texture.name.clone(), texture.clone());
        texture
    }

    /// Get a texture by name.
    pub fn get(&self, name: &str) -> Option<Arc<Texture>> {
        self.textures.get(name).cloned()
    }

    /// Get the number of textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
