//! Triangle geometry.

use std::sync::Arc;

use lumen_math::{Vec2, Vec3};

use crate::material::Material;

/// A triangle corner with position, shading normal and texture coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Normalized UV (origin bottom-left)
    pub texture: Vec2,
}

impl Vertex {
    /// Create a vertex at `position` with no normal or texture coordinate.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: Vec2) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }
}

/// A triangle bound to a shared material.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Corners in winding order
    pub vertices: [Vertex; 3],

    /// Unit face normal from the winding, `(v1 - v0) x (v2 - v0)`
    pub normal: Vec3,

    /// Shared material
    pub material: Arc<Material>,
}

impl Triangle {
    /// Create a triangle, computing its face normal from the winding.
    ///
    /// Vertices without a normal take the face normal. Degenerate
    /// triangles get a zero normal.
    pub fn new(vertices: [Vertex; 3], material: Arc<Material>) -> Self {
        let normal = face_normal([
            vertices[0].position,
            vertices[1].position,
            vertices[2].position,
        ]);

        let vertices = vertices.map(|mut v| {
            if v.normal == Vec3::ZERO {
                v.normal = normal;
            }
            v
        });

        Self {
            vertices,
            normal,
            material,
        }
    }

    /// Create a triangle from bare positions.
    pub fn from_positions(positions: [Vec3; 3], material: Arc<Material>) -> Self {
        Self::new(positions.map(Vertex::new), material)
    }

    /// Corner positions.
    #[inline]
    pub fn positions(&self) -> [Vec3; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }

    /// Per-vertex shading normals.
    #[inline]
    pub fn vertex_normals(&self) -> [Vec3; 3] {
        [
            self.vertices[0].normal,
            self.vertices[1].normal,
            self.vertices[2].normal,
        ]
    }

    /// Per-vertex texture coordinates.
    #[inline]
    pub fn texture_coords(&self) -> [Vec2; 3] {
        [
            self.vertices[0].texture,
            self.vertices[1].texture,
            self.vertices[2].texture,
        ]
    }

    /// Mean of the three corners.
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.positions();
        (a + b + c) / 3.0
    }
}

/// Unit normal of a counter-clockwise triangle, or zero if degenerate.
pub fn face_normal(positions: [Vec3; 3]) -> Vec3 {
    let [v0, v1, v2] = positions;
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}
