//! Branch growth engine
//!
//! Grows one [`AxonTree`] from a root position and direction. Each step
//! advances along the current heading, tapers the radius with the distance
//! travelled, tilts the heading by a small random rotation and may fork.
//! Growth stops when a step would exceed `layer_count_max` or
//! `total_length_max`.
//!
//! The recursion is unrolled onto an explicit stack of frames. A frame
//! spawns its branches one at a time and each child's subtree completes
//! before the next sibling draws its jitter, so random draws happen in the
//! same order as a recursive depth-first build.

use glam::{Mat4, Vec3};

use crate::core::Result;
use crate::math::{EulerJitter, RandomSource, angle_between_degrees, compose_transform, ring_points, rotate_within_cone_angle};
use crate::mesh::SurfaceMesh;

use super::node::{AxonTree, BranchNode, NodeId};
use super::params::GrowthParams;
use super::seeding::RootSeed;

/// Layers below this always advance by `segment_length_min`.
const SMOOTH_START_LAYERS: u32 = 5;

/// Where and how thick a tree starts.
#[derive(Clone, Copy, Debug)]
pub struct GrowthOrigin {
    /// World-space root position
    pub position: Vec3,
    /// Initial heading (normalized by the builder)
    pub direction: Vec3,
    /// Root radius; also the tree's maximum for tapering
    pub radius: f32,
}

/// State carried from one growth step to the next.
#[derive(Clone, Copy, Debug)]
struct Step {
    position: Vec3,
    direction: Vec3,
    layer_index: u32,
    /// Distance the next step will advance
    layer_length: f32,
    path_length: f32,
    radius: f32,
    points_matrix: Mat4,
    size_attenuation: f32,
}

/// A node whose branches are still being grown.
struct Frame {
    node: NodeId,
    step: Step,
    branch_count: u8,
    spawned: u8,
}

/// Grows axon trees for one parameter set.
pub struct TreeBuilder<'a> {
    params: &'a GrowthParams,
}

impl<'a> TreeBuilder<'a> {
    /// Fails with [`Error::Config`](crate::core::Error::Config) before any
    /// growth when `params` would produce degenerate geometry.
    pub fn new(params: &'a GrowthParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Compute the root of a tree seeded at a mesh vertex: inset and
    /// transformed position, normal tilted within the root cone, and a
    /// per-tree radius in `[0.5, 1.0] * radius_max`.
    ///
    /// The cone is centered on the vertex normal after the mesh transform,
    /// not on the raw model-space normal. The two differ whenever the
    /// transform rotates or scales non-uniformly.
    pub fn origin_on_mesh<R: RandomSource + ?Sized>(&self, mesh: &SurfaceMesh, vertex_index: usize, rng: &mut R) -> GrowthOrigin {
        let position = mesh.world_position(vertex_index, self.params.root_inset_scale);
        let normal = mesh.world_normal(vertex_index);
        let direction = rotate_within_cone_angle(normal, self.params.root_cone_angle_max, rng).normalize();
        let radius = rng.range(0.5 * self.params.radius_max, self.params.radius_max);
        GrowthOrigin { position, direction, radius }
    }

    /// Seed and grow a whole tree at a mesh vertex
    pub fn grow_on_mesh<R: RandomSource + ?Sized>(&self, mesh: &SurfaceMesh, seed: RootSeed, rng: &mut R) -> AxonTree {
        let origin = self.origin_on_mesh(mesh, seed.vertex_index, rng);
        self.grow(&origin, seed, rng)
    }

    /// Grow a tree from an explicit origin
    pub fn grow<R: RandomSource + ?Sized>(&self, origin: &GrowthOrigin, seed: RootSeed, rng: &mut R) -> AxonTree {
        let root_step = Step {
            position: origin.position,
            direction: origin.direction.normalize(),
            layer_index: 0,
            layer_length: self.params.segment_length_min,
            path_length: 0.0,
            radius: origin.radius,
            points_matrix: Mat4::IDENTITY,
            size_attenuation: 1.0,
        };

        let mut nodes: Vec<BranchNode> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        // layer_count_max >= 2 and path_length 0 always admit the root
        stack.extend(self.enter(root_step, None, &mut nodes, rng));

        while let Some(frame) = stack.last_mut() {
            if frame.spawned == frame.branch_count {
                stack.pop();
                continue;
            }
            frame.spawned += 1;
            let parent = frame.node;
            let child_step = self.advance(&frame.step, origin.radius, rng);

            if let Some(child) = self.enter(child_step, Some(parent), &mut nodes, rng) {
                stack.push(child);
            }
        }

        let tree = AxonTree::from_nodes(nodes, seed.vertex_index, seed.random_seed);
        log::debug!(
            "Grew axon tree at vertex {}: {} nodes, {} leaves, {} layers",
            seed.vertex_index,
            tree.node_count(),
            tree.leaf_count(),
            tree.max_layer() + 1
        );
        tree
    }

    /// Materialize a step as a node, or stop growth past the depth and length caps.
    fn enter<R: RandomSource + ?Sized>(
        &self,
        step: Step,
        parent: Option<NodeId>,
        nodes: &mut Vec<BranchNode>,
        rng: &mut R,
    ) -> Option<Frame> {
        if step.layer_index >= self.params.layer_count_max - 1 || step.path_length > self.params.total_length_max {
            return None;
        }

        let ring = match parent {
            None => ring_points(step.position, step.direction, step.radius, self.params.ring_segment_count),
            Some(parent) => nodes[parent.index()]
                .ring_points
                .iter()
                .map(|p| step.points_matrix.transform_point3(*p))
                .collect(),
        };

        let id = NodeId(nodes.len() as u32);
        nodes.push(BranchNode {
            position: step.position,
            direction: step.direction,
            radius: step.radius,
            ring_points: ring,
            layer_index: step.layer_index,
            size_attenuation: step.size_attenuation,
            path_length: step.path_length,
            points_matrix: step.points_matrix,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            nodes[parent.index()].children.push(id);
        }

        let branch_count = if rng.chance(self.params.split_probability) { 2 } else { 1 };
        Some(Frame {
            node: id,
            step,
            branch_count,
            spawned: 0,
        })
    }

    /// Derive the next step: advance, taper, jitter the heading and build
    /// the ring transform from this node to the next.
    fn advance<R: RandomSource + ?Sized>(&self, step: &Step, radius_max: f32, rng: &mut R) -> Step {
        let params = self.params;
        let position = step.position + step.direction * step.layer_length;
        let path_length = step.path_length + step.layer_length;

        let radius = (radius_max * params.length_falloff(path_length, params.radius_attenuation_exponent))
            .max(params.radius_min);
        let size_attenuation = params.length_falloff(path_length, params.size_attenuation_exponent);
        let scale = if step.radius > 0.0 { radius / step.radius } else { 1.0 };

        let jitter = EulerJitter::sample(params.direction_jitter_max_angle, rng);
        let direction = jitter.rotate(step.direction);
        let points_matrix = compose_transform(
            step.position,
            position - step.position,
            jitter.as_vec3(),
            Vec3::splat(scale),
        );

        let angle = angle_between_degrees(step.direction, direction);
        let layer_length = self.segment_length(angle, step.layer_index);

        Step {
            position,
            direction: direction.normalize(),
            layer_index: step.layer_index + 1,
            layer_length,
            path_length,
            radius,
            points_matrix,
            size_attenuation,
        }
    }

    /// Sharper turns take shorter steps; the first layers always take the
    /// shortest one.
    fn segment_length(&self, angle_degrees: f32, layer_index: u32) -> f32 {
        let params = self.params;
        let angle_max = params.layer_angle_max();
        let length = if angle_max > 0.0 {
            let t = ((angle_max - angle_degrees) / angle_max).max(0.0);
            params.segment_length_max * t * t
        } else {
            params.segment_length_max
        };

        if length < params.segment_length_min || layer_index < SMOOTH_START_LAYERS {
            params.segment_length_min
        } else {
            length
        }
    }
}
