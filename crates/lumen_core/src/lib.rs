//! Lumen Core - scene model for the Lumen renderers.
//!
//! This crate provides:
//!
//! - **Geometry**: `Vertex`, `Triangle`
//! - **Materials**: `Material` with uniform, textured, mirror and refractive kinds
//! - **Textures**: packed pixel grids and a named `TextureLibrary`
//! - **Scene**: a triangle arena with lights, built by `SceneBuilder`
//!
//! # Example
//!
//! ```
//! use lumen_core::{Colour, Material, SceneBuilder};
//! use lumen_math::Vec3;
//!
//! let mut builder = SceneBuilder::new();
//! builder.add_material(Material::uniform("red", Colour::new(1.0, 0.0, 0.0)));
//! builder.add_triangle([Vec3::ZERO, Vec3::X, Vec3::Y], "red");
//! builder.add_light(Vec3::new(0.0, 0.0, 2.0));
//! let scene = builder.build().unwrap();
//! assert_eq!(scene.triangle_count(), 1);
//! ```

pub mod colour;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use colour::{pack_colour, rgb8, unpack_colour, Colour, DEFAULT_GREY, WHITE};
pub use material::{Material, MaterialKind, REFLECTIVE_PREVIEW};
pub use mesh::{face_normal, Triangle, Vertex};
pub use scene::{FaceSlot, Light, Scene, SceneBuilder, SceneError, SceneResult};
pub use texture::{Texture, TextureError, TextureLibrary, TextureResult};
