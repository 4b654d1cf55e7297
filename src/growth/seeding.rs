//! Root seed selection on a surface mesh

use crate::core::{Error, Result};
use crate::math::RandomSource;

/// A chosen root: mesh vertex plus its per-tree random triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootSeed {
    pub vertex_index: usize,
    pub random_seed: [f32; 3],
}

/// Pick up to `axon_count` vertex indices spread over `[0, vertex_count)`.
///
/// The index space is cut into `axon_count` contiguous ranges of
/// `vertex_count / axon_count` vertices; one index is drawn uniformly from
/// each. Trailing vertices past the last full range are never picked.
/// The ranges are disjoint, so the result holds exactly `axon_count`
/// distinct, ascending indices.
pub fn seed_roots<R: RandomSource + ?Sized>(vertex_count: usize, axon_count: usize, rng: &mut R) -> Result<Vec<RootSeed>> {
    if axon_count == 0 {
        return Err(Error::Config("axon_count must be at least 1".to_string()));
    }
    let range_len = vertex_count / axon_count;
    if range_len == 0 {
        return Err(Error::Config(format!(
            "cannot seed {} roots on {} vertices",
            axon_count, vertex_count
        )));
    }

    let seeds: Vec<RootSeed> = (0..axon_count)
        .map(|i| {
            let vertex_index = i * range_len + rng.index(range_len);
            let random_seed = [rng.next_f32(), rng.next_f32(), rng.next_f32()];
            RootSeed { vertex_index, random_seed }
        })
        .collect();

    Ok(seeds)
}
