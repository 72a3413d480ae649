//! Scene model: a triangle arena, materials and point lights.
//!
//! Scenes are assembled by [`SceneBuilder`], which is the boundary with the
//! external mesh/material loader. It resolves material names, validates
//! indices and computes smooth vertex normals from a per-vertex adjacency
//! list. A built [`Scene`] is immutable for the duration of a frame.

use std::collections::HashMap;
use std::sync::Arc;

use lumen_math::{Vec2, Vec3};
use thiserror::Error;

use crate::material::Material;
use crate::mesh::{Triangle, Vertex};
use crate::texture::{Texture, TextureError, TextureLibrary};

/// Errors that can occur while building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Unknown texture {texture} referenced by material {material}")]
    UnknownTexture { material: String, texture: String },

    #[error("Face {face} references vertex {index}, but only {count} vertices exist")]
    VertexIndexOutOfRange { face: usize, index: usize, count: usize },

    #[error("Face {face} references texture coordinate {index}, but only {count} exist")]
    TextureCoordOutOfRange { face: usize, index: usize, count: usize },

    #[error("Scene has no lights")]
    NoLights,

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
}

impl Light {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Slot of a vertex inside a triangle of the arena: (triangle index, corner).
pub type FaceSlot = (usize, usize);

/// A complete scene ready for rendering.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Triangle arena
    triangles: Vec<Triangle>,

    /// Point lights (at least one)
    lights: Vec<Light>,

    /// Materials by name
    materials: HashMap<String, Arc<Material>>,

    /// For each shared vertex, the triangle corners that use it
    vertex_faces: Vec<Vec<FaceSlot>>,
}

impl Scene {
    /// Create a scene from already-built triangles.
    ///
    /// No vertex adjacency is recorded; vertex normals are used as given.
    pub fn new(triangles: Vec<Triangle>, lights: Vec<Light>) -> SceneResult<Self> {
        if lights.is_empty() {
            return Err(SceneError::NoLights);
        }

        let mut materials = HashMap::new();
        for triangle in &triangles {
            materials
                .entry(triangle.material.name.clone())
                .or_insert_with(|| triangle.material.clone());
        }

        Ok(Self {
            triangles,
            lights,
            materials,
            vertex_faces: Vec::new(),
        })
    }

    /// All triangles, in arena order.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Triangle by arena index.
    #[inline]
    pub fn triangle(&self, index: usize) -> &Triangle {
        &self.triangles[index]
    }

    /// Point lights.
    #[inline]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Get a material by name.
    pub fn material(&self, name: &str) -> Option<&Arc<Material>> {
        self.materials.get(name)
    }

    /// Triangle corners sharing builder vertex `vertex`.
    pub fn faces_sharing(&self, vertex: usize) -> &[FaceSlot] {
        self.vertex_faces
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Mean position of every triangle corner.
    pub fn centre(&self) -> Vec3 {
        if self.triangles.is_empty() {
            return Vec3::ZERO;
        }

        let sum: Vec3 = self
            .triangles
            .iter()
            .flat_map(|t| t.positions())
            .sum();
        sum / (self.triangles.len() * 3) as f32
    }
}

/// A face waiting to be resolved by the builder.
#[derive(Clone, Debug)]
struct Face {
    vertices: [usize; 3],
    texture_coords: Option<[usize; 3]>,
    material: String,
}

/// Incrementally assembles a [`Scene`] from indexed geometry.
pub struct SceneBuilder {
    positions: Vec<Vec3>,
    texture_coords: Vec<Vec2>,
    faces: Vec<Face>,
    materials: HashMap<String, Arc<Material>>,
    textures: TextureLibrary,
    lights: Vec<Light>,
    smooth_normals: bool,
}

impl SceneBuilder {
    /// Create an empty builder. Smooth normals are computed by default.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            texture_coords: Vec::new(),
            faces: Vec::new(),
            materials: HashMap::new(),
            textures: TextureLibrary::new(),
            lights: Vec::new(),
            smooth_normals: true,
        }
    }

    /// Enable or disable averaging of face normals into vertex normals.
    pub fn with_smooth_normals(mut self, smooth_normals: bool) -> Self {
        self.smooth_normals = smooth_normals;
        self
    }

    /// Add a shared vertex position and return its index.
    pub fn add_vertex(&mut self, position: Vec3) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    /// Add a texture coordinate and return its index.
    pub fn add_texture_coord(&mut self, uv: Vec2) -> usize {
        self.texture_coords.push(uv);
        self.texture_coords.len() - 1
    }

    /// Register a texture.
    pub fn add_texture(&mut self, texture: Texture) -> Arc<Texture> {
        self.textures.insert(texture)
    }

    /// Register a material under its name.
    pub fn add_material(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials.insert(material.name.clone(), material.clone());
        material
    }

    /// Register a textured material that samples a previously added texture.
    pub fn add_textured_material(
        &mut self,
        name: &str,
        texture_name: &str,
    ) -> SceneResult<Arc<Material>> {
        let texture = self
            .textures
            .get(texture_name)
            .ok_or_else(|| SceneError::UnknownTexture {
                material: name.to_string(),
                texture: texture_name.to_string(),
            })?;
        Ok(self.add_material(Material::textured(name, texture)))
    }

    /// Add a face over three vertex indices.
    pub fn add_face(&mut self, vertices: [usize; 3], material: &str) {
        self.faces.push(Face {
            vertices,
            texture_coords: None,
            material: material.to_string(),
        });
    }

    /// Add a face with per-corner texture coordinate indices.
    pub fn add_textured_face(&mut self, vertices: [usize; 3], texture_coords: [usize; 3], material: &str) {
        self.faces.push(Face {
            vertices,
            texture_coords: Some(texture_coords),
            material: material.to_string(),
        });
    }

    /// Add a standalone triangle that shares no vertices.
    pub fn add_triangle(&mut self, positions: [Vec3; 3], material: &str) {
        let vertices = positions.map(|p| self.add_vertex(p));
        self.add_face(vertices, material);
    }

    /// Add a point light.
    pub fn add_light(&mut self, position: Vec3) {
        self.lights.push(Light::new(position));
    }

    /// Resolve faces into triangles and produce the scene.
    pub fn build(self) -> SceneResult<Scene> {
        if self.lights.is_empty() {
            return Err(SceneError::NoLights);
        }

        let mut triangles = Vec::with_capacity(self.faces.len());
        let mut vertex_faces: Vec<Vec<FaceSlot>> = vec![Vec::new(); self.positions.len()];
        let fallback = Arc::new(Material::default());
        let mut materials = self.materials;

        for (face_index, face) in self.faces.iter().enumerate() {
            let mut corners = [Vertex::default(); 3];

            for (slot, &index) in face.vertices.iter().enumerate() {
                let position = *self.positions.get(index).ok_or(SceneError::VertexIndexOutOfRange {
                    face: face_index,
                    index,
                    count: self.positions.len(),
                })?;
                corners[slot].position = position;
                vertex_faces[index].push((face_index, slot));
            }

            if let Some(coords) = face.texture_coords {
                for (slot, &index) in coords.iter().enumerate() {
                    corners[slot].texture = *self.texture_coords.get(index).ok_or(
                        SceneError::TextureCoordOutOfRange {
                            face: face_index,
                            index,
                            count: self.texture_coords.len(),
                        },
                    )?;
                }
            }

            let material = match materials.get(&face.material) {
                Some(material) => material.clone(),
                None => {
                    log::warn!(
                        "Face {} uses unknown material {}, substituting default grey",
                        face_index,
                        face.material
                    );
                    materials.insert(face.material.clone(), fallback.clone());
                    fallback.clone()
                }
            };

            triangles.push(Triangle::new(corners, material));
        }

        if self.smooth_normals {
            smooth_vertex_normals(&mut triangles, &vertex_faces);
        }

        log::info!(
            "Built scene: {} triangles, {} vertices, {} materials, {} lights",
            triangles.len(),
            self.positions.len(),
            materials.len(),
            self.lights.len()
        );

        Ok(Scene {
            triangles,
            lights: self.lights,
            materials,
            vertex_faces,
        })
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace each shared vertex's normal with the normalized mean of the face
/// normals around it.
fn smooth_vertex_normals(triangles: &mut [Triangle], vertex_faces: &[Vec<FaceSlot>]) {
    for slots in vertex_faces {
        let sum: Vec3 = slots.iter().map(|&(face, _)| triangles[face].normal).sum();
        let normal = sum.normalize_or_zero();
        if normal == Vec3::ZERO {
            continue;
        }

        for &(face, slot) in slots {
            triangles[face].vertices[slot].normal = normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::{Colour, DEFAULT_GREY};
    use crate::material::MaterialKind;

    /// Two triangles folded along the shared edge v0-v1.
    fn folded_builder() -> SceneBuilder {
        let mut builder = SceneBuilder::new();
        builder.add_material(Material::uniform("red", Colour::X));
        let v0 = builder.add_vertex(Vec3::ZERO);
        let v1 = builder.add_vertex(Vec3::X);
        let v2 = builder.add_vertex(Vec3::Y);
        let v3 = builder.add_vertex(Vec3::new(0.0, 0.0, -1.0));
        builder.add_face([v0, v1, v2], "red");
        builder.add_face([v0, v1, v3], "red");
        builder.add_light(Vec3::new(0.0, 2.0, 2.0));
        builder
    }

    #[test]
    fn test_build_counts() {
        let scene = folded_builder().build().unwrap();
        assert_eq!(scene.triangle_count(), 2);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.material_count(), 1);
    }

    #[test]
    fn test_adjacency_and_smooth_normals() {
        let scene = folded_builder().build().unwrap();

        // v0 and v1 are shared by both faces
        assert_eq!(scene.faces_sharing(0), &[(0, 0), (1, 0)]);
        assert_eq!(scene.faces_sharing(1), &[(0, 1), (1, 1)]);
        assert_eq!(scene.faces_sharing(2), &[(0, 2)]);

        // Face normals are +Z and +Y, so the shared edge gets their bisector
        assert_eq!(scene.triangle(0).normal, Vec3::Z);
        assert_eq!(scene.triangle(1).normal, Vec3::Y);
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((scene.triangle(0).vertices[0].normal - expected).length() < 1e-6);
        assert!((scene.triangle(1).vertices[1].normal - expected).length() < 1e-6);

        // Unshared corners keep their face normal
        assert_eq!(scene.triangle(0).vertices[2].normal, Vec3::Z);
    }

    #[test]
    fn test_flat_normals_when_smoothing_disabled() {
        let scene = folded_builder().with_smooth_normals(false).build().unwrap();
        assert_eq!(scene.triangle(0).vertex_normals(), [Vec3::Z; 3]);
    }

    #[test]
    fn test_missing_material_becomes_grey() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut builder = SceneBuilder::new();
        builder.add_triangle([Vec3::ZERO, Vec3::X, Vec3::Y], "nowhere");
        builder.add_light(Vec3::Z);
        let scene = builder.build().unwrap();

        let material = &scene.triangle(0).material;
        assert!(matches!(material.kind, MaterialKind::Uniform(c) if c == DEFAULT_GREY));
        assert!(scene.material("nowhere").is_some());
    }

    #[test]
    fn test_vertex_index_out_of_range() {
        let mut builder = SceneBuilder::new();
        builder.add_vertex(Vec3::ZERO);
        builder.add_face([0, 1, 2], "grey");
        builder.add_light(Vec3::Z);

        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            SceneError::VertexIndexOutOfRange { face: 0, index: 1, count: 1 }
        ));
    }

    #[test]
    fn test_textured_faces_resolve_uvs() {
        let mut builder = SceneBuilder::new();
        builder.add_texture(Texture::solid_color(Colour::ONE));
        builder.add_textured_material("tiles", "<solid>").unwrap();
        let v = [Vec3::ZERO, Vec3::X, Vec3::Y].map(|p| builder.add_vertex(p));
        let t = [Vec2::ZERO, Vec2::X, Vec2::Y].map(|uv| builder.add_texture_coord(uv));
        builder.add_textured_face(v, t, "tiles");
        builder.add_light(Vec3::Z);

        let scene = builder.build().unwrap();
        assert_eq!(scene.triangle(0).texture_coords(), [Vec2::ZERO, Vec2::X, Vec2::Y]);
    }

    #[test]
    fn test_unknown_texture_rejected() {
        let mut builder = SceneBuilder::new();
        let err = builder.add_textured_material("tiles", "missing.ppm").unwrap_err();
        assert!(matches!(err, SceneError::UnknownTexture { .. }));
    }

    #[test]
    fn test_scene_requires_lights() {
        let mut builder = SceneBuilder::new();
        builder.add_triangle([Vec3::ZERO, Vec3::X, Vec3::Y], "grey");
        assert!(matches!(builder.build(), Err(SceneError::NoLights)));
        assert!(matches!(Scene::new(Vec::new(), Vec::new()), Err(SceneError::NoLights)));
    }

    #[test]
    fn test_centre() {
        let scene = folded_builder().build().unwrap();
        // (0,0,0)+(1,0,0)+(0,1,0) + (0,0,0)+(0,0,-1)+(1,0,0) over 6
        let expected = Vec3::new(2.0, 1.0, -1.0) / 6.0;
        assert!((scene.centre() - expected).length() < 1e-6);
    }
}
