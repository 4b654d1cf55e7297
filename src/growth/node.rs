//! Axon tree storage
//!
//! Nodes live in a flat arena owned by [`AxonTree`]; parents hold child
//! handles. Construction appends nodes in depth-first pre-order, and the
//! tree is immutable once built.

use glam::{Mat4, Vec3};

/// Handle to a node inside one [`AxonTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: Self = Self(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One growth step of a branch.
#[derive(Clone, Debug)]
pub struct BranchNode {
    /// World-space center of the cross-section
    pub position: Vec3,
    /// Unit growth heading
    pub direction: Vec3,
    pub radius: f32,
    /// Cross-section samples, `ring_segment_count` of them
    pub ring_points: Vec<Vec3>,
    /// Depth from the root (root = 0)
    pub layer_index: u32,
    /// Point size falloff in `[0, 1]`
    pub size_attenuation: f32,
    /// Cumulative distance travelled from the root
    pub path_length: f32,
    /// Maps the parent's ring points onto this node's ring points
    /// (identity at the root)
    pub points_matrix: Mat4,
    pub parent: Option<NodeId>,
    /// Zero, one or two children, in growth order
    pub children: Vec<NodeId>,
}

impl BranchNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A branching tree grown from one root seed.
#[derive(Clone, Debug)]
pub struct AxonTree {
    nodes: Vec<BranchNode>,
    root_vertex_index: usize,
    root_random_seed: [f32; 3],
}

impl AxonTree {
    pub(crate) fn from_nodes(nodes: Vec<BranchNode>, root_vertex_index: usize, root_random_seed: [f32; 3]) -> Self {
        debug_assert!(!nodes.is_empty(), "axon tree without a root");
        Self {
            nodes,
            root_vertex_index,
            root_random_seed,
        }
    }

    /// Mesh vertex this tree was seeded from
    pub fn root_vertex_index(&self) -> usize {
        self.root_vertex_index
    }

    /// Per-tree random triple used to vary shader animation
    pub fn root_random_seed(&self) -> [f32; 3] {
        self.root_random_seed
    }

    pub fn root(&self) -> &BranchNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &BranchNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&BranchNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[BranchNode] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every non-root node has exactly one incoming edge
    pub fn edge_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Deepest layer index reached
    pub fn max_layer(&self) -> u32 {
        self.nodes.iter().map(|n| n.layer_index).max().unwrap_or(0)
    }

    /// Sum of ring sample counts over all nodes
    pub fn ring_point_count(&self) -> usize {
        self.nodes.iter().map(|n| n.ring_points.len()).sum()
    }

    /// Node handles in depth-first pre-order: a node, then each child
    /// subtree in child-list order.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// `(parent, child)` pairs in the order the tube mesh emits them:
    /// depth-first, each edge directly before its child's subtree.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.depth_first()
            .filter_map(move |id| self.parent(id).map(|parent| (parent, id)))
    }
}

/// Pre-order traversal over an [`AxonTree`].
pub struct DepthFirst<'a> {
    tree: &'a AxonTree,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(layer: u32, parent: Option<u32>, children: &[u32]) -> BranchNode {
        BranchNode {
            position: Vec3::new(0.0, layer as f32, 0.0),
            direction: Vec3::Y,
            radius: 0.1,
            ring_points: vec![Vec3::ZERO; 4],
            layer_index: layer,
            size_attenuation: 1.0,
            path_length: layer as f32,
            points_matrix: Mat4::IDENTITY,
            parent: parent.map(NodeId),
            children: children.iter().copied().map(NodeId).collect(),
        }
    }

    /// 0 -> (1 -> 2, 3)
    fn forked() -> AxonTree {
        AxonTree::from_nodes(
            vec![
                node(0, None, &[1, 3]),
                node(1, Some(0), &[2]),
                node(2, Some(1), &[]),
                node(1, Some(0), &[]),
            ],
            7,
            [0.1, 0.2, 0.3],
        )
    }

    #[test]
    fn test_counts() {
        let tree = forked();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.edge_count(), 3);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.max_layer(), 2);
        assert_eq!(tree.ring_point_count(), 16);
        assert_eq!(tree.root_vertex_index(), 7);
    }

    #[test]
    fn test_depth_first_order() {
        let tree = forked();
        let order: Vec<u32> = tree.depth_first().map(|id| id.0).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_edges_order() {
        let tree = forked();
        let edges: Vec<(u32, u32)> = tree.edges().map(|(a, b)| (a.0, b.0)).collect();
        assert_eq!(edges, vec![(0, 1), (1, 2), (0, 3)]);
    }

    #[test]
    fn test_parent_links() {
        let tree = forked();
        assert_eq!(tree.parent(NodeId::ROOT), None);
        assert_eq!(tree.parent(NodeId(2)), Some(NodeId(1)));
        assert!(tree.get(NodeId(9)).is_none());
    }
}
