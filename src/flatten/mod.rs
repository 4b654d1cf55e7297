//! Flattening axon trees into renderable buffers
//!
//! Two passes walk each tree depth-first and write parallel attribute arrays:
//! - `points`: one point per ring sample, for animated point sprites
//! - `tube`: a triangulated tube around every branch edge
//!
//! Both carry the tree's root normal, root UV and random triple on every
//! vertex so shaders can animate each tree independently. `lines` emits the
//! bare skeleton for debugging.

pub mod points;
pub mod tube;
pub mod lines;
pub mod vertex;

pub use points::{PointCloud, flatten_to_points};
pub use tube::{TubeMesh, flatten_to_tube_mesh};
pub use lines::{flatten_to_lines, forest_lines};
pub use vertex::{PointVertex, TubeVertex, as_bytes};

use glam::{Vec2, Vec3};

use crate::core::Result;
use crate::growth::AxonTree;
use crate::mesh::SurfaceMesh;

/// Per-tree attributes replicated onto every emitted vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootAttributes {
    /// Model-space normal of the seed vertex
    pub normal: Vec3,
    /// UV of the seed vertex
    pub uv: Vec2,
    pub random: Vec3,
}

impl RootAttributes {
    /// Read the seed vertex of `tree` from `mesh`
    pub fn of(tree: &AxonTree, mesh: &SurfaceMesh) -> Result<Self> {
        let index = tree.root_vertex_index();
        mesh.check_index(index)?;
        Ok(Self {
            normal: mesh.normal(index),
            uv: mesh.uv(index),
            random: Vec3::from_array(tree.root_random_seed()),
        })
    }
}
