//! Traveling light walker
//!
//! A walker moves a light along the edges of one axon tree. Progress along
//! the current edge rises with elapsed time; each time it passes 1 the edge
//! is committed and a random child becomes the next target. At a leaf the
//! light stops and fades out, then releases its tree back to the
//! [`RootPool`] and claims another one.

use glam::Vec3;

use crate::growth::{AxonForest, AxonTree, NodeId};
use crate::math::RandomSource;

use super::config::{LightConfig, Lookahead};
use super::pool::RootPool;

/// Lifecycle of one walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerPhase {
    /// Freshly reseeded; moving while the fade rises to 1
    FadingIn,
    /// Moving at full fade
    Advancing,
    /// Parked on a leaf while the fade falls to 0
    FadingOut,
    /// No tree claimed; retries the pool every update
    Idle,
}

/// Position of a walker inside the forest.
///
/// `next` is either `current` or one of its children. With
/// [`Lookahead::Double`], `upcoming` is a child of `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkerCursor {
    pub tree: usize,
    pub current: NodeId,
    pub next: NodeId,
    pub upcoming: Option<NodeId>,
}

/// One animated light.
#[derive(Debug, Clone)]
pub struct LightWalker {
    cursor: Option<WalkerCursor>,
    phase: WalkerPhase,
    /// Interpolation between `current` and `next`, in `[0, 1)`
    progress: f32,
    progress_rate: f32,
    fade: f32,
}

impl Default for LightWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl LightWalker {
    /// An idle walker; it claims a tree on its first update.
    pub fn new() -> Self {
        Self {
            cursor: None,
            phase: WalkerPhase::Idle,
            progress: 0.0,
            progress_rate: 0.0,
            fade: 0.0,
        }
    }

    pub fn phase(&self) -> WalkerPhase {
        self.phase
    }

    pub fn cursor(&self) -> Option<&WalkerCursor> {
        self.cursor.as_ref()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Edges per second for the current tree
    pub fn progress_rate(&self) -> f32 {
        self.progress_rate
    }

    pub fn fade(&self) -> f32 {
        self.fade
    }

    /// Step once with this frame's elapsed time.
    ///
    /// Must be called exactly once per frame. Negative or NaN `dt` counts
    /// as zero.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        forest: &AxonForest,
        pool: &mut RootPool,
        config: &LightConfig,
        dt: f32,
        rng: &mut R,
    ) {
        let dt = dt.max(0.0);

        match self.phase {
            WalkerPhase::Idle => self.reseed(forest, pool, config, rng),
            WalkerPhase::FadingOut => {
                self.fade = (self.fade - dt * config.fade_rate).max(0.0);
                if self.fade <= 0.0 {
                    self.release(pool);
                    self.reseed(forest, pool, config, rng);
                }
            }
            WalkerPhase::FadingIn | WalkerPhase::Advancing => {
                self.progress += dt * self.progress_rate;
                while self.progress >= 1.0 {
                    self.progress -= 1.0;
                    if !self.commit_edge(forest, config, rng) {
                        self.progress = 0.0;
                        self.phase = WalkerPhase::FadingOut;
                        break;
                    }
                }
                if self.phase != WalkerPhase::FadingOut {
                    self.fade = (self.fade + dt * config.fade_rate).min(1.0);
                    if self.fade >= 1.0 {
                        self.phase = WalkerPhase::Advancing;
                    }
                }
            }
        }

        self.fade = self.fade.clamp(0.0, 1.0);
    }

    /// Interpolated world position, or `None` while idle
    pub fn position(&self, forest: &AxonForest) -> Option<Vec3> {
        let cursor = self.cursor?;
        let tree = forest.tree(cursor.tree)?;
        let from = tree.get(cursor.current)?.position;
        let to = tree.get(cursor.next)?.position;
        Some(from.lerp(to, self.progress))
    }

    /// Give the claimed tree back to the pool
    pub fn release(&mut self, pool: &mut RootPool) {
        if let Some(cursor) = self.cursor.take() {
            pool.release(cursor.tree);
        }
        self.phase = WalkerPhase::Idle;
        self.progress = 0.0;
        self.fade = 0.0;
    }

    /// Claim a free tree and start at its root with zero fade.
    fn reseed<R: RandomSource + ?Sized>(
        &mut self,
        forest: &AxonForest,
        pool: &mut RootPool,
        config: &LightConfig,
        rng: &mut R,
    ) {
        self.phase = WalkerPhase::Idle;
        self.progress = 0.0;
        self.fade = 0.0;

        let Some(tree_index) = pool.acquire(rng) else {
            log::trace!("No free root for light walker");
            return;
        };
        let Some(tree) = forest.tree(tree_index) else {
            log::warn!("Root pool handed out tree {} but forest has {}", tree_index, forest.len());
            pool.release(tree_index);
            return;
        };

        self.progress_rate = config.base_progress_rate * (rng.next_f32() + 0.5);

        let current = NodeId::ROOT;
        let next = pick_child(tree, current, rng);
        let upcoming = match (config.lookahead, next) {
            (Lookahead::Double, Some(next)) => pick_child(tree, next, rng),
            _ => None,
        };

        self.cursor = Some(WalkerCursor {
            tree: tree_index,
            current,
            next: next.unwrap_or(current),
            upcoming,
        });
        self.phase = if next.is_some() {
            WalkerPhase::FadingIn
        } else {
            WalkerPhase::FadingOut
        };
        log::debug!(
            "Light walker claimed tree {} at {:.2} edges/s ({:?})",
            tree_index,
            self.progress_rate,
            self.phase
        );
    }

    /// Move onto `next` and choose the following target. Returns false at a leaf.
    fn commit_edge<R: RandomSource + ?Sized>(&mut self, forest: &AxonForest, config: &LightConfig, rng: &mut R) -> bool {
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };
        let Some(tree) = forest.tree(cursor.tree) else {
            return false;
        };

        cursor.current = cursor.next;
        let next = match cursor.upcoming.take() {
            Some(upcoming) => Some(upcoming),
            None => pick_child(tree, cursor.current, rng),
        };

        match next {
            Some(next) => {
                cursor.next = next;
                if config.lookahead == Lookahead::Double {
                    cursor.upcoming = pick_child(tree, next, rng);
                }
                true
            }
            None => {
                cursor.next = cursor.current;
                false
            }
        }
    }
}

fn pick_child<R: RandomSource + ?Sized>(tree: &AxonTree, id: NodeId, rng: &mut R) -> Option<NodeId> {
    let children = tree.children(id);
    if children.is_empty() {
        None
    } else {
        Some(children[rng.index(children.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{GrowthOrigin, GrowthParams, RootSeed, TreeBuilder};
    use crate::math::random::testing::ConstRng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grow(params: &GrowthParams, rng: &mut impl RandomSource) -> AxonTree {
        let origin = GrowthOrigin { position: Vec3::ZERO, direction: Vec3::Y, radius: 0.1 };
        let seed = RootSeed { vertex_index: 0, random_seed: [0.0; 3] };
        TreeBuilder::new(params).unwrap().grow(&origin, seed, rng)
    }

    fn branching_forest(count: usize, seed: u64) -> AxonForest {
        let params = GrowthParams { split_probability: 0.2, layer_count_max: 14, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        AxonForest::from_trees((0..count).map(|_| grow(&params, &mut rng)).collect())
    }

    fn root_only_forest() -> AxonForest {
        let params = GrowthParams { layer_count_max: 2, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1);
        AxonForest::from_trees(vec![grow(&params, &mut rng)])
    }

    fn assert_on_edge(walker: &LightWalker, forest: &AxonForest) {
        if let Some(c) = walker.cursor() {
            let tree = forest.tree(c.tree).unwrap();
            assert!(c.current == c.next || tree.children(c.current).contains(&c.next));
            if let Some(upcoming) = c.upcoming {
                assert!(tree.children(c.next).contains(&upcoming));
            }
        }
    }

    #[test]
    fn test_first_update_claims_a_root() {
        let forest = branching_forest(2, 1);
        let mut pool = RootPool::new(forest.len());
        let config = LightConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut walker = LightWalker::new();

        walker.update(&forest, &mut pool, &config, 0.016, &mut rng);
        let cursor = walker.cursor().unwrap();
        assert_eq!(cursor.current, NodeId::ROOT);
        assert_eq!(walker.phase(), WalkerPhase::FadingIn);
        assert_eq!(walker.fade(), 0.0);
        assert_eq!(pool.available(), 1);
        assert!(!pool.is_free(cursor.tree));
        assert!(walker.progress_rate() >= 5.0 && walker.progress_rate() < 15.0);
    }

    #[test]
    fn test_edge_validity_every_frame() {
        let forest = branching_forest(3, 3);
        let mut pool = RootPool::new(forest.len());
        let config = LightConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut walker = LightWalker::new();

        for frame in 0..5000 {
            let dt = if frame % 97 == 0 { 0.5 } else { 1.0 / 60.0 };
            walker.update(&forest, &mut pool, &config, dt, &mut rng);
            assert_on_edge(&walker, &forest);
            assert!((0.0..1.0).contains(&walker.progress()));
        }
    }

    #[test]
    fn test_double_lookahead_stays_on_edges() {
        let forest = branching_forest(2, 5);
        let mut pool = RootPool::new(forest.len());
        let config = LightConfig { lookahead: Lookahead::Double, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(6);
        let mut walker = LightWalker::new();

        for _ in 0..3000 {
            walker.update(&forest, &mut pool, &config, 1.0 / 30.0, &mut rng);
            assert_on_edge(&walker, &forest);
        }
    }

    #[test]
    fn test_fade_bounds_with_huge_dt() {
        let forest = branching_forest(2, 7);
        let mut pool = RootPool::new(forest.len());
        let config = LightConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut walker = LightWalker::new();

        for dt in [0.0, 1e6, f32::MAX, -5.0, f32::NAN, 1e-3, f32::INFINITY] {
            walker.update(&forest, &mut pool, &config, dt, &mut rng);
            assert!((0.0..=1.0).contains(&walker.fade()));
            assert_on_edge(&walker, &forest);
        }
    }

    #[test]
    fn test_huge_dt_reaches_leaf() {
        let forest = branching_forest(1, 9);
        let mut pool = RootPool::new(1);
        let config = LightConfig::default();
        let mut rng = StdRng::seed_from_u64(10);
        let mut walker = LightWalker::new();

        walker.update(&forest, &mut pool, &config, 0.0, &mut rng);
        walker.update(&forest, &mut pool, &config, 1e6, &mut rng);
        assert_eq!(walker.phase(), WalkerPhase::FadingOut);
        let cursor = walker.cursor().unwrap();
        assert_eq!(cursor.current, cursor.next);
        assert!(forest.tree(0).unwrap().node(cursor.current).is_leaf());
        assert_eq!(walker.progress(), 0.0);
    }

    #[test]
    fn test_fade_rises_while_advancing() {
        let forest = branching_forest(1, 11);
        let mut pool = RootPool::new(1);
        let config = LightConfig { base_progress_rate: 0.001, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(12);
        let mut walker = LightWalker::new();

        walker.update(&forest, &mut pool, &config, 0.1, &mut rng);
        walker.update(&forest, &mut pool, &config, 0.25, &mut rng);
        assert!((walker.fade() - 0.25).abs() < 1e-6);
        assert_eq!(walker.phase(), WalkerPhase::FadingIn);
        walker.update(&forest, &mut pool, &config, 1.0, &mut rng);
        assert_eq!(walker.fade(), 1.0);
        assert_eq!(walker.phase(), WalkerPhase::Advancing);
    }

    #[test]
    fn test_root_only_tree_fades_out_and_reseeds() {
        let forest = root_only_forest();
        let mut pool = RootPool::new(1);
        let config = LightConfig::default();
        let mut rng = ConstRng::HALF;
        let mut walker = LightWalker::new();

        walker.update(&forest, &mut pool, &config, 0.1, &mut rng);
        assert_eq!(walker.phase(), WalkerPhase::FadingOut);
        let cursor = *walker.cursor().unwrap();
        assert_eq!(cursor.current, NodeId::ROOT);
        assert_eq!(cursor.next, NodeId::ROOT);
        assert_eq!(walker.position(&forest), Some(forest.tree(0).unwrap().root().position));

        // Fade is already 0: the next update releases and reclaims the only root
        walker.update(&forest, &mut pool, &config, 0.1, &mut rng);
        assert_eq!(walker.phase(), WalkerPhase::FadingOut);
        assert_eq!(walker.cursor().unwrap().tree, 0);
        assert_eq!(pool.available(), 0);
        assert_eq!(walker.fade(), 0.0);
    }

    #[test]
    fn test_empty_pool_leaves_light_dark() {
        let forest = branching_forest(1, 13);
        let mut pool = RootPool::new(1);
        let config = LightConfig::default();
        let mut rng = StdRng::seed_from_u64(14);
        let mut first = LightWalker::new();
        let mut second = LightWalker::new();

        first.update(&forest, &mut pool, &config, 0.1, &mut rng);
        second.update(&forest, &mut pool, &config, 0.1, &mut rng);
        assert_eq!(second.phase(), WalkerPhase::Idle);
        assert_eq!(second.fade(), 0.0);
        assert!(second.position(&forest).is_none());

        first.release(&mut pool);
        second.update(&forest, &mut pool, &config, 0.1, &mut rng);
        assert_eq!(second.phase(), WalkerPhase::FadingIn);
    }

    #[test]
    fn test_position_interpolates_edge() {
        let forest = branching_forest(1, 15);
        let mut pool = RootPool::new(1);
        let config = LightConfig::default();
        let mut rng = StdRng::seed_from_u64(16);
        let mut walker = LightWalker::new();

        walker.update(&forest, &mut pool, &config, 0.0, &mut rng);
        let dt = 0.5 / walker.progress_rate();
        walker.update(&forest, &mut pool, &config, dt, &mut rng);

        let cursor = walker.cursor().unwrap();
        let tree = forest.tree(cursor.tree).unwrap();
        let expected = tree.node(cursor.current).position.lerp(tree.node(cursor.next).position, walker.progress());
        assert!((walker.position(&forest).unwrap() - expected).length() < 1e-6);
        assert!((walker.progress() - 0.5).abs() < 1e-4);
    }
}
