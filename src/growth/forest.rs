//! All axon trees grown on one surface mesh

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::core::Result;
use crate::math::RandomSource;
use crate::mesh::SurfaceMesh;

use super::builder::TreeBuilder;
use super::node::AxonTree;
use super::params::GrowthParams;
use super::seeding::seed_roots;

/// One tree per surviving root seed, in seed order.
#[derive(Clone, Debug, Default)]
pub struct AxonForest {
    trees: Vec<AxonTree>,
}

impl AxonForest {
    /// Wrap trees grown elsewhere
    pub fn from_trees(trees: Vec<AxonTree>) -> Self {
        Self { trees }
    }

    /// Validate, seed roots and grow every tree sequentially from `rng`.
    ///
    /// Fails before producing any geometry when the parameters are invalid
    /// or cannot be seeded on `mesh`.
    pub fn grow<R: RandomSource + ?Sized>(mesh: &SurfaceMesh, params: &GrowthParams, rng: &mut R) -> Result<Self> {
        params.validate_for_mesh(mesh)?;
        let seeds = seed_roots(mesh.vertex_count(), params.axon_count, rng)?;

        let builder = TreeBuilder::new(params)?;
        let trees = seeds
            .into_iter()
            .map(|seed| builder.grow_on_mesh(mesh, seed, rng))
            .collect();

        let forest = Self { trees };
        forest.log_summary();
        Ok(forest)
    }

    /// Like [`AxonForest::grow`], but trees grow in parallel.
    ///
    /// Root seeds come from `seed`; each tree then gets its own generator
    /// derived from `seed` and its position, so the result does not depend
    /// on thread scheduling.
    pub fn grow_parallel(mesh: &SurfaceMesh, params: &GrowthParams, seed: u64) -> Result<Self> {
        params.validate_for_mesh(mesh)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let seeds = seed_roots(mesh.vertex_count(), params.axon_count, &mut rng)?;

        let builder = TreeBuilder::new(params)?;
        let trees = seeds
            .par_iter()
            .enumerate()
            .map(|(i, root)| {
                let mut tree_rng = StdRng::seed_from_u64(tree_seed(seed, i));
                builder.grow_on_mesh(mesh, *root, &mut tree_rng)
            })
            .collect();

        let forest = Self { trees };
        forest.log_summary();
        Ok(forest)
    }

    pub fn trees(&self) -> &[AxonTree] {
        &self.trees
    }

    pub fn tree(&self, index: usize) -> Option<&AxonTree> {
        self.trees.get(index)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(AxonTree::node_count).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.trees.iter().map(AxonTree::edge_count).sum()
    }

    pub fn ring_point_count(&self) -> usize {
        self.trees.iter().map(AxonTree::ring_point_count).sum()
    }

    fn log_summary(&self) {
        log::info!(
            "Grew {} axon trees: {} nodes, {} edges",
            self.trees.len(),
            self.node_count(),
            self.edge_count()
        );
    }
}

/// SplitMix-style spread of the tree index over the seed space
fn tree_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
