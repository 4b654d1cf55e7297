//! All traveling lights on one forest

use glam::Vec3;
use serde::Serialize;

use crate::core::Result;
use crate::growth::AxonForest;
use crate::math::RandomSource;

use super::config::LightConfig;
use super::pool::RootPool;
use super::walker::{LightWalker, WalkerPhase};

/// Per-frame output of one visible light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSample {
    pub position: Vec3,
    /// Fade factor in `[0, 1]`
    pub fade: f32,
    /// Point light intensity, already scaled by `fade`
    pub light_intensity: f32,
    /// Glow sprite intensity, already scaled by `fade`
    pub glow_intensity: f32,
    pub tree_index: usize,
    pub root_vertex_index: usize,
    pub root_random_seed: [f32; 3],
}

/// A root pool and its walkers, bound to one forest.
pub struct LightField<'a> {
    forest: &'a AxonForest,
    config: LightConfig,
    pool: RootPool,
    walkers: Vec<LightWalker>,
}

impl<'a> LightField<'a> {
    /// `light_count` idle walkers sharing one pool over every tree of `forest`
    pub fn new(forest: &'a AxonForest, light_count: usize, config: LightConfig) -> Result<Self> {
        config.validate()?;
        if light_count > forest.len() {
            log::warn!(
                "{} lights for {} trees; {} will stay dark",
                light_count,
                forest.len(),
                light_count - forest.len()
            );
        }
        Ok(Self {
            forest,
            config,
            pool: RootPool::new(forest.len()),
            walkers: vec![LightWalker::new(); light_count],
        })
    }

    /// Step every walker exactly once
    pub fn update<R: RandomSource + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let Self { forest, config, pool, walkers } = self;
        for walker in walkers.iter_mut() {
            walker.update(*forest, pool, config, dt, rng);
        }
    }

    /// Lights that currently sit on a tree, in walker order
    pub fn samples(&self) -> Vec<LightSample> {
        self.walkers
            .iter()
            .filter_map(|walker| {
                let cursor = walker.cursor()?;
                let tree = self.forest.tree(cursor.tree)?;
                let position = walker.position(self.forest)?;
                Some(LightSample {
                    position,
                    fade: walker.fade(),
                    light_intensity: self.config.light_intensity * walker.fade(),
                    glow_intensity: self.config.glow_intensity * walker.fade(),
                    tree_index: cursor.tree,
                    root_vertex_index: tree.root_vertex_index(),
                    root_random_seed: tree.root_random_seed(),
                })
            })
            .collect()
    }

    pub fn walkers(&self) -> &[LightWalker] {
        &self.walkers
    }

    pub fn pool(&self) -> &RootPool {
        &self.pool
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    /// Walkers waiting for a free root
    pub fn idle_count(&self) -> usize {
        self.walkers.iter().filter(|w| w.phase() == WalkerPhase::Idle).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::GrowthParams;
    use crate::mesh::SurfaceMesh;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn forest(seed: u64) -> AxonForest {
        let mesh = SurfaceMesh::uv_sphere(1.0, 16, 8).unwrap();
        let params = GrowthParams { axon_count: 4, split_probability: 0.1, layer_count_max: 14, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        AxonForest::grow(&mesh, &params, &mut rng).unwrap()
    }

    #[test]
    fn test_lights_claim_distinct_trees() {
        let forest = forest(1);
        let mut field = LightField::new(&forest, forest.len(), LightConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..600 {
            field.update(1.0 / 60.0, &mut rng);
            let claimed: Vec<usize> = field.walkers().iter().filter_map(|w| w.cursor().map(|c| c.tree)).collect();
            let unique: HashSet<usize> = claimed.iter().copied().collect();
            assert_eq!(claimed.len(), unique.len());
            assert_eq!(claimed.len() + field.pool().available(), forest.len());
        }
    }

    #[test]
    fn test_extra_lights_stay_dark() {
        let forest = forest(3);
        let mut field = LightField::new(&forest, forest.len() + 2, LightConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        field.update(0.016, &mut rng);
        assert_eq!(field.idle_count(), 2);
        assert_eq!(field.samples().len(), forest.len());
    }

    #[test]
    fn test_samples_scale_with_fade() {
        let forest = forest(5);
        let config = LightConfig { base_progress_rate: 0.01, ..Default::default() };
        let mut field = LightField::new(&forest, 1, config).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        field.update(0.0, &mut rng);
        field.update(0.5, &mut rng);

        let samples = field.samples();
        assert_eq!(samples.len(), 1);
        let sample = samples[0];
        assert!((sample.fade - 0.5).abs() < 1e-6);
        assert!((sample.light_intensity - 1.0).abs() < 1e-5);
        assert!((sample.glow_intensity - 5.0).abs() < 1e-5);
        let tree = forest.tree(sample.tree_index).unwrap();
        assert_eq!(sample.root_vertex_index, tree.root_vertex_index());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let forest = forest(7);
        let config = LightConfig { fade_rate: 0.0, ..Default::default() };
        assert!(LightField::new(&forest, 1, config).is_err());
    }
}
