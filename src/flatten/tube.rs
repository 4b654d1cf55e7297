//! Tube-mesh flattening
//!
//! For every branch edge the parent and child rings are stitched into a
//! band of quads, two triangles per ring index:
//! `(parent[j], child[j], child[j-1])` and `(parent[j], parent[j+1], child[j])`.
//! Normals point radially out from each ring's own center. U runs as a tent
//! over the ring index so the texture mirrors instead of tearing at the
//! wraparound, and V advances with the layer.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::core::Result;
use crate::growth::{AxonForest, AxonTree, BranchNode, GrowthParams};
use crate::math::RandomSource;
use crate::mesh::SurfaceMesh;

use super::RootAttributes;
use super::vertex::TubeVertex;

/// Non-indexed triangle list with parallel attributes.
#[derive(Clone, Debug, Default)]
pub struct TubeMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub layers: Vec<f32>,
    pub root_normals: Vec<Vec3>,
    pub root_uvs: Vec<Vec2>,
    pub root_randoms: Vec<Vec3>,
}

/// One emitted corner: which ring and which sample on it
#[derive(Clone, Copy)]
struct Corner<'a> {
    node: &'a BranchNode,
    index: usize,
    u: f32,
    v: f32,
}

impl TubeMesh {
    /// Flatten every tree of a forest into one mesh
    pub fn from_forest<R: RandomSource + ?Sized>(
        forest: &AxonForest,
        mesh: &SurfaceMesh,
        params: &GrowthParams,
        rng: &mut R,
    ) -> Result<Self> {
        let ring = params.ring_segment_count;
        let mut tube = Self::with_capacity(6 * ring * forest.edge_count());
        for tree in forest.trees() {
            tube.append_tree(tree, mesh, params, rng)?;
        }
        log::debug!(
            "Flattened {} axon trees into {} tube triangles",
            forest.len(),
            tube.triangle_count()
        );
        Ok(tube)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            uvs: Vec::with_capacity(capacity),
            layers: Vec::with_capacity(capacity),
            root_normals: Vec::with_capacity(capacity),
            root_uvs: Vec::with_capacity(capacity),
            root_randoms: Vec::with_capacity(capacity),
        }
    }

    /// Append the tube around every edge of `tree`, depth-first.
    ///
    /// Draws one random number: the tree's horizontal texture start.
    pub fn append_tree<R: RandomSource + ?Sized>(
        &mut self,
        tree: &AxonTree,
        mesh: &SurfaceMesh,
        params: &GrowthParams,
        rng: &mut R,
    ) -> Result<()> {
        let root = RootAttributes::of(tree, mesh)?;
        let uv_span = tree.root().radius * 2.0 * PI / params.total_length_max;
        let u_start = rng.next_f32() * (1.0 - uv_span);

        for (parent, child) in tree.edges() {
            self.append_segment(tree.node(parent), tree.node(child), u_start, &root, params);
        }
        Ok(())
    }

    fn append_segment(
        &mut self,
        parent: &BranchNode,
        child: &BranchNode,
        u_start: f32,
        root: &RootAttributes,
        params: &GrowthParams,
    ) {
        let len = parent.ring_points.len();
        let half = len as f32 / 2.0;
        let du_parent = parent.radius * PI / (params.total_length_max * half);
        let du_child = child.radius * PI / (params.total_length_max * half);
        let v_parent = parent.layer_index as f32 / params.layer_count_max as f32;
        let v_child = child.layer_index as f32 / params.layer_count_max as f32;

        // Tent-shaped U: peaks at the ring midpoint, equal at both wrap ends
        let tent = |du: f32, j: f32| u_start + du * half - (du * (j - half)).abs();

        for j in 0..len {
            let prev = (j + len - 1) % len;
            let next = (j + 1) % len;

            let p_j = Corner { node: parent, index: j, u: tent(du_parent, j as f32), v: v_parent };
            let p_next = Corner { node: parent, index: next, u: tent(du_parent, (j + 1) as f32), v: v_parent };
            let c_j = Corner { node: child, index: j, u: tent(du_child, j as f32), v: v_child };
            let c_prev = Corner { node: child, index: prev, u: tent(du_child, prev as f32), v: v_child };

            for corner in [p_j, c_j, c_prev, p_j, p_next, c_j] {
                self.push_corner(corner, root);
            }
        }
    }

    fn push_corner(&mut self, corner: Corner<'_>, root: &RootAttributes) {
        let point = corner.node.ring_points[corner.index];
        self.positions.push(point);
        self.normals.push((point - corner.node.position).normalize_or_zero());
        self.uvs.push(Vec2::new(corner.u, corner.v));
        self.layers.push(corner.node.layer_index as f32);
        self.root_normals.push(root.normal);
        self.root_uvs.push(root.uv);
        self.root_randoms.push(root.random);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave the channels for upload
    pub fn vertices(&self) -> Vec<TubeVertex> {
        (0..self.vertex_count())
            .map(|i| TubeVertex {
                position: self.positions[i].to_array(),
                normal: self.normals[i].to_array(),
                uv: self.uvs[i].to_array(),
                layer: self.layers[i],
                root_normal: self.root_normals[i].to_array(),
                root_uv: self.root_uvs[i].to_array(),
                root_random: self.root_randoms[i].to_array(),
            })
            .collect()
    }
}

/// Flatten a single tree into a tube mesh
pub fn flatten_to_tube_mesh<R: RandomSource + ?Sized>(
    tree: &AxonTree,
    mesh: &SurfaceMesh,
    params: &GrowthParams,
    rng: &mut R,
) -> Result<TubeMesh> {
    let mut tube = TubeMesh::with_capacity(6 * params.ring_segment_count * tree.edge_count());
    tube.append_tree(tree, mesh, params, rng)?;
    Ok(tube)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{GrowthOrigin, NodeId, RootSeed, TreeBuilder};
    use crate::math::random::testing::ConstRng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mesh() -> SurfaceMesh {
        SurfaceMesh::new(vec![Vec3::ZERO, Vec3::X], vec![Vec3::Z, Vec3::X], vec![Vec2::ZERO, Vec2::ONE]).unwrap()
    }

    fn tree(params: &GrowthParams, rng: &mut impl RandomSource) -> AxonTree {
        let origin = GrowthOrigin { position: Vec3::ZERO, direction: Vec3::Z, radius: 0.1 };
        let seed = RootSeed { vertex_index: 1, random_seed: [0.7, 0.8, 0.9] };
        TreeBuilder::new(params).unwrap().grow(&origin, seed, rng)
    }

    #[test]
    fn test_vertex_count_six_per_ring_index_per_edge() {
        let params = GrowthParams { split_probability: 0.2, layer_count_max: 14, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let tree = tree(&params, &mut rng);
        let tube = flatten_to_tube_mesh(&tree, &mesh(), &params, &mut rng).unwrap();

        let expected = 6 * params.ring_segment_count * tree.edge_count();
        assert_eq!(tube.vertex_count(), expected);
        assert_eq!(tube.normals.len(), expected);
        assert_eq!(tube.uvs.len(), expected);
        assert_eq!(tube.layers.len(), expected);
        assert_eq!(tube.root_normals.len(), expected);
        assert_eq!(tube.root_uvs.len(), expected);
        assert_eq!(tube.root_randoms.len(), expected);
        assert_eq!(tube.vertices().len(), expected);
    }

    #[test]
    fn test_root_only_tree_is_empty() {
        let params = GrowthParams { layer_count_max: 2, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(2);
        let tree = tree(&params, &mut rng);
        let tube = flatten_to_tube_mesh(&tree, &mesh(), &params, &mut rng).unwrap();
        assert!(tube.is_empty());
    }

    #[test]
    fn test_first_quad_winding() {
        let params = GrowthParams::default();
        let mut rng = StdRng::seed_from_u64(3);
        let tree = tree(&params, &mut rng);
        let tube = flatten_to_tube_mesh(&tree, &mesh(), &params, &mut rng).unwrap();

        let parent = tree.root();
        let child = tree.node(tree.children(NodeId::ROOT)[0]);
        let n = params.ring_segment_count;
        assert_eq!(tube.positions[0], parent.ring_points[0]);
        assert_eq!(tube.positions[1], child.ring_points[0]);
        assert_eq!(tube.positions[2], child.ring_points[n - 1]);
        assert_eq!(tube.positions[3], parent.ring_points[0]);
        assert_eq!(tube.positions[4], parent.ring_points[1]);
        assert_eq!(tube.positions[5], child.ring_points[0]);
        assert_eq!(tube.layers[0..6], [0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normals_radial_and_unit() {
        let params = GrowthParams::default();
        let mut rng = StdRng::seed_from_u64(4);
        let tree = tree(&params, &mut rng);
        let tube = flatten_to_tube_mesh(&tree, &mesh(), &params, &mut rng).unwrap();

        let parent = tree.root();
        let expected = (parent.ring_points[0] - parent.position).normalize();
        assert!((tube.normals[0] - expected).length() < 1e-5);
        for n in &tube.normals {
            assert!((n.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_uv_tent_and_layer_v() {
        // Straight growth: every draw is 0.5
        let params = GrowthParams::default();
        let mut rng = ConstRng::HALF;
        let tree = tree(&params, &mut rng);
        let tube = flatten_to_tube_mesh(&tree, &mesh(), &params, &mut rng).unwrap();

        let n = params.ring_segment_count as f32;
        let radius = tree.root().radius;
        let u_start = 0.5 * (1.0 - radius * 2.0 * PI / params.total_length_max);
        let du = radius * PI / (params.total_length_max * n / 2.0);

        // j = 0 on the parent ring sits at the tent's foot
        assert!((tube.uvs[0].x - u_start).abs() < 1e-6);
        assert_eq!(tube.uvs[0].y, 0.0);
        assert!((tube.uvs[1].y - 1.0 / params.layer_count_max as f32).abs() < 1e-6);
        // parent[j+1] for j = 0
        assert!((tube.uvs[4].x - (u_start + du)).abs() < 1e-6);

        // Tent is symmetric: j and len - j share U on the parent ring
        let u_at = |j: usize| tube.uvs[6 * j].x;
        assert!((u_at(1) - u_at(params.ring_segment_count - 1)).abs() < 1e-6);
        // Peak at the midpoint
        let mid = params.ring_segment_count / 2;
        assert!((u_at(mid) - (u_start + du * n / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_root_attributes_replicated() {
        let params = GrowthParams::default();
        let mut rng = StdRng::seed_from_u64(5);
        let tree = tree(&params, &mut rng);
        let tube = flatten_to_tube_mesh(&tree, &mesh(), &params, &mut rng).unwrap();
        assert!(tube.root_normals.iter().all(|n| *n == Vec3::X));
        assert!(tube.root_uvs.iter().all(|uv| *uv == Vec2::ONE));
        assert!(tube.root_randoms.iter().all(|r| *r == Vec3::new(0.7, 0.8, 0.9)));
    }

    #[test]
    fn test_from_forest_total() {
        let mesh = SurfaceMesh::uv_sphere(1.0, 16, 8).unwrap();
        let params = GrowthParams { split_probability: 0.05, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(6);
        let forest = AxonForest::grow(&mesh, &params, &mut rng).unwrap();
        let tube = TubeMesh::from_forest(&forest, &mesh, &params, &mut rng).unwrap();
        assert_eq!(tube.vertex_count(), 6 * params.ring_segment_count * forest.edge_count());
        assert_eq!(tube.triangle_count(), 2 * params.ring_segment_count * forest.edge_count());
    }
}
