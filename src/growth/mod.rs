//! Axon tree growth
//!
//! Roots are seeded on a [`SurfaceMesh`](crate::mesh::SurfaceMesh), then each
//! root grows an [`AxonTree`] of tapered, jittered, occasionally forking
//! branch nodes carrying rings of cross-section points.

pub mod params;
pub mod node;
pub mod seeding;
pub mod builder;
pub mod forest;

pub use params::GrowthParams;
pub use node::{AxonTree, BranchNode, DepthFirst, NodeId};
pub use seeding::{RootSeed, seed_roots};
pub use builder::{GrowthOrigin, TreeBuilder};
pub use forest::AxonForest;
