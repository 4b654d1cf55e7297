//! Point-cloud flattening

use glam::{Vec2, Vec3};

use crate::core::Result;
use crate::growth::{AxonForest, AxonTree, GrowthParams};
use crate::math::RandomSource;
use crate::mesh::SurfaceMesh;

use super::RootAttributes;
use super::vertex::PointVertex;

/// Parallel point attributes; every channel has one entry per point.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub layers: Vec<f32>,
    pub root_normals: Vec<Vec3>,
    pub root_uvs: Vec<Vec2>,
    pub root_randoms: Vec<Vec3>,
    pub size_attenuations: Vec<f32>,
    /// Random per-point texture lookup
    pub uvs: Vec<Vec2>,
    /// Layer-graded tint scaled by `color_intensity`
    pub colors: Vec<Vec3>,
}

impl PointCloud {
    /// Flatten every tree of a forest into one cloud
    pub fn from_forest<R: RandomSource + ?Sized>(
        forest: &AxonForest,
        mesh: &SurfaceMesh,
        params: &GrowthParams,
        rng: &mut R,
    ) -> Result<Self> {
        let mut cloud = Self::with_capacity(forest.ring_point_count());
        for tree in forest.trees() {
            cloud.append_tree(tree, mesh, params, rng)?;
        }
        log::debug!("Flattened {} axon trees into {} points", forest.len(), cloud.len());
        Ok(cloud)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            layers: Vec::with_capacity(capacity),
            root_normals: Vec::with_capacity(capacity),
            root_uvs: Vec::with_capacity(capacity),
            root_randoms: Vec::with_capacity(capacity),
            size_attenuations: Vec::with_capacity(capacity),
            uvs: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Append all ring points of `tree`, root first, depth-first.
    pub fn append_tree<R: RandomSource + ?Sized>(
        &mut self,
        tree: &AxonTree,
        mesh: &SurfaceMesh,
        params: &GrowthParams,
        rng: &mut R,
    ) -> Result<()> {
        let root = RootAttributes::of(tree, mesh)?;

        for id in tree.depth_first() {
            let node = tree.node(id);
            let layer = node.layer_index as f32;
            let ratio = layer / params.layer_count_max as f32;

            for point in &node.ring_points {
                self.positions.push(*point);
                self.root_normals.push(root.normal);
                self.root_uvs.push(root.uv);
                self.layers.push(layer);
                self.root_randoms.push(root.random);
                self.size_attenuations.push(node.size_attenuation);

                let u = rng.next_f32();
                let v = rng.next_f32();
                self.uvs.push(Vec2::new(u, v));

                let r = 0.1 * (1.0 - ratio) + 0.1 * rng.next_f32();
                let g = 0.1;
                let b = 0.8 * ratio + 0.2 * rng.next_f32();
                self.colors.push(Vec3::new(r, g, b) * params.color_intensity);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave the channels for upload
    pub fn vertices(&self) -> Vec<PointVertex> {
        (0..self.len())
            .map(|i| PointVertex {
                position: self.positions[i].to_array(),
                layer: self.layers[i],
                root_normal: self.root_normals[i].to_array(),
                size_attenuation: self.size_attenuations[i],
                root_uv: self.root_uvs[i].to_array(),
                uv: self.uvs[i].to_array(),
                root_random: self.root_randoms[i].to_array(),
                color: self.colors[i].to_array(),
            })
            .collect()
    }
}

/// Flatten a single tree into a point cloud
pub fn flatten_to_points<R: RandomSource + ?Sized>(
    tree: &AxonTree,
    mesh: &SurfaceMesh,
    params: &GrowthParams,
    rng: &mut R,
) -> Result<PointCloud> {
    let mut cloud = PointCloud::with_capacity(tree.ring_point_count());
    cloud.append_tree(tree, mesh, params, rng)?;
    Ok(cloud)
}
