//! Skeleton line segments for debug drawing

use glam::Vec3;

use crate::growth::{AxonForest, AxonTree};

/// One `(parent, child)` position pair per edge, depth-first.
pub fn flatten_to_lines(tree: &AxonTree) -> Vec<[Vec3; 2]> {
    tree.edges()
        .map(|(parent, child)| [tree.node(parent).position, tree.node(child).position])
        .collect()
}

/// Skeleton lines of every tree, concatenated in tree order
pub fn forest_lines(forest: &AxonForest) -> Vec<[Vec3; 2]> {
    forest.trees().iter().flat_map(flatten_to_lines).collect()
}
