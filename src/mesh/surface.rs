//! Read-only triangle surface that axon trees grow from

use glam::{Mat4, Vec2, Vec3};

use crate::core::{Error, Result};

/// Per-vertex position, normal and UV arrays plus a model-to-world transform.
///
/// Growth only reads vertex attributes by index; the mesh is never mutated.
#[derive(Clone, Debug)]
pub struct SurfaceMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    transform: Mat4,
}

impl SurfaceMesh {
    /// Create a mesh from parallel attribute arrays with an identity transform
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, uvs: Vec<Vec2>) -> Result<Self> {
        if positions.is_empty() {
            return Err(Error::Mesh("mesh has no vertices".to_string()));
        }
        if normals.len() != positions.len() || uvs.len() != positions.len() {
            return Err(Error::Mesh(format!(
                "attribute length mismatch: {} positions, {} normals, {} uvs",
                positions.len(),
                normals.len(),
                uvs.len()
            )));
        }
        if let Some(i) = normals.iter().position(|n| n.length_squared() <= f32::EPSILON || !n.is_finite()) {
            return Err(Error::Mesh(format!("vertex {} has a degenerate normal", i)));
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            transform: Mat4::IDENTITY,
        })
    }

    /// Replace the model-to-world transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Model-space position of vertex `index`
    pub fn position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    /// Model-space normal of vertex `index`
    pub fn normal(&self, index: usize) -> Vec3 {
        self.normals[index]
    }

    pub fn uv(&self, index: usize) -> Vec2 {
        self.uvs[index]
    }

    /// World-space position of vertex `index` after pulling it towards the
    /// model origin by `inset` (1.0 keeps it on the surface).
    pub fn world_position(&self, index: usize, inset: f32) -> Vec3 {
        self.transform.transform_point3(self.positions[index] * inset)
    }

    /// World-space unit normal of vertex `index`
    pub fn world_normal(&self, index: usize) -> Vec3 {
        self.transform
            .transform_vector3(self.normals[index])
            .normalize_or(self.normals[index].normalize())
    }

    /// Check that `index` addresses a vertex
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.positions.len() {
            Ok(())
        } else {
            Err(Error::Mesh(format!(
                "vertex index {} out of range for {} vertices",
                index,
                self.positions.len()
            )))
        }
    }

    /// Create a UV sphere centered on the origin.
    ///
    /// `segments` runs around the equator, `rings` from pole to pole.
    /// Normals point outwards; UVs span `[0, 1]` in both directions.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Result<Self> {
        if segments < 3 || rings < 2 {
            return Err(Error::Mesh(format!(
                "uv sphere needs at least 3 segments and 2 rings, got {}x{}",
                segments, rings
            )));
        }
        if !(radius > 0.0) {
            return Err(Error::Mesh(format!("uv sphere radius must be positive, got {}", radius)));
        }

        let vertex_count = ((segments + 1) * (rings + 1)) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let phi = v * std::f32::consts::PI;
            for segment in 0..=segments {
                let u = segment as f32 / segments as f32;
                let theta = u * std::f32::consts::TAU;
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                positions.push(normal * radius);
                normals.push(normal);
                uvs.push(Vec2::new(u, 1.0 - v));
            }
        }

        Self::new(positions, normals, uvs)
    }
}
