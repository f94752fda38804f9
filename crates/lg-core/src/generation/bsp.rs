//! Binary space partitioning of the room bounds
//!
//! Nodes live in an arena and refer to their children by index. The leaves
//! of a finished tree tile the root bounds exactly: every split hands the
//! whole parent rectangle to its two children.

use serde::{Deserialize, Serialize};

use crate::consts::BSP_ASPECT_SPLIT;
use crate::grid::GridRect;
use crate::rng::GenRng;

/// Index of a node in a [`BspTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Which coordinate a split cuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Cut at an x coordinate: left and right children
    X,
    /// Cut at a y coordinate: lower and upper children
    Y,
}

impl SplitAxis {
    fn flipped(self) -> Self {
        match self {
            SplitAxis::X => SplitAxis::Y,
            SplitAxis::Y => SplitAxis::X,
        }
    }
}

/// How an interior node was divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BspSplit {
    pub axis: SplitAxis,
    /// Absolute coordinate of the cut; the high child starts here
    pub at: i32,
    /// Low child (left or lower), then high child
    pub children: [NodeId; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BspNode {
    pub bounds: GridRect,
    pub depth: u32,
    pub split: Option<BspSplit>,
}

impl BspNode {
    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }
}

/// Partitioning limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspParams {
    pub min_leaf_size: i32,
    pub max_depth: u32,
    /// Fraction of the node side the cut may move away from the midpoint
    pub split_jitter: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    /// Partition `bounds`
    pub fn build(bounds: GridRect, params: &BspParams, rng: &mut GenRng) -> Self {
        let mut tree = Self {
            nodes: vec![BspNode {
                bounds,
                depth: 0,
                split: None,
            }],
        };

        // (node, axis used by the parent)
        let mut pending = vec![(NodeId(0), SplitAxis::Y)];
        while let Some((id, parent_axis)) = pending.pop() {
            let node = &tree.nodes[id.0];
            let Some(axis) = choose_axis(node, params, parent_axis, rng) else {
                continue;
            };
            let bounds = node.bounds;
            let depth = node.depth + 1;
            let at = split_position(&bounds, axis, params, rng);

            let (low, high) = match axis {
                SplitAxis::X => (
                    GridRect::new(bounds.x, bounds.y, at - bounds.x, bounds.height),
                    GridRect::new(at, bounds.y, bounds.right() - at, bounds.height),
                ),
                SplitAxis::Y => (
                    GridRect::new(bounds.x, bounds.y, bounds.width, at - bounds.y),
                    GridRect::new(bounds.x, at, bounds.width, bounds.top() - at),
                ),
            };

            let low_id = tree.push(low, depth);
            let high_id = tree.push(high, depth);
            tree.nodes[id.0].split = Some(BspSplit {
                axis,
                at,
                children: [low_id, high_id],
            });

            // High first so the low child is processed first
            pending.push((high_id, axis));
            pending.push((low_id, axis));
        }

        tree
    }

    fn push(&mut self, bounds: GridRect, depth: u32) -> NodeId {
        self.nodes.push(BspNode {
            bounds,
            depth,
            split: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn root(&self) -> &BspNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&BspNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[BspNode] {
        &self.nodes
    }

    /// Leaves in depth-first order, low child first
    pub fn leaves(&self) -> Vec<&BspNode> {
        let mut leaves = Vec::new();
        let mut stack = vec![NodeId(0)];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            match &node.split {
                None => leaves.push(node),
                Some(split) => {
                    stack.push(split.children[1]);
                    stack.push(split.children[0]);
                }
            }
        }
        leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Deepest node depth
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// Pick an axis for `node`, or None if it stays a leaf
fn choose_axis(
    node: &BspNode,
    params: &BspParams,
    parent_axis: SplitAxis,
    rng: &mut GenRng,
) -> Option<SplitAxis> {
    if node.depth >= params.max_depth {
        return None;
    }
    let min = params.min_leaf_size.max(1);
    let can_x = node.bounds.width >= 2 * min;
    let can_y = node.bounds.height >= 2 * min;

    match (can_x, can_y) {
        (false, false) => None,
        (true, false) => Some(SplitAxis::X),
        (false, true) => Some(SplitAxis::Y),
        (true, true) => {
            let w = node.bounds.width as f32;
            let h = node.bounds.height as f32;
            if w >= h * BSP_ASPECT_SPLIT {
                Some(SplitAxis::X)
            } else if h >= w * BSP_ASPECT_SPLIT {
                Some(SplitAxis::Y)
            } else if rng.one_in(4) {
                // Near-square: usually alternate, sometimes repeat
                Some(parent_axis)
            } else {
                Some(parent_axis.flipped())
            }
        }
    }
}

/// Absolute cut coordinate, jittered around the midpoint
fn split_position(bounds: &GridRect, axis: SplitAxis, params: &BspParams, rng: &mut GenRng) -> i32 {
    let (start, size) = match axis {
        SplitAxis::X => (bounds.x, bounds.width),
        SplitAxis::Y => (bounds.y, bounds.height),
    };
    let min = params.min_leaf_size.max(1);
    let span = (size as f32 * params.split_jitter) as i32;
    let offset = if span > 0 { rng.range(-span, span) } else { 0 };
    start + (size / 2 + offset).clamp(min, size - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BspParams {
        BspParams {
            min_leaf_size: 10,
            max_depth: 4,
            split_jitter: 0.2,
        }
    }

    fn assert_tiles(tree: &BspTree) {
        let root = tree.root().bounds;
        let leaves = tree.leaves();
        let area: i64 = leaves.iter().map(|l| l.bounds.area()).sum();
        assert_eq!(area, root.area(), "leaf areas must sum to the root area");
        for (i, a) in leaves.iter().enumerate() {
            assert!(root.contains_rect(&a.bounds));
            for b in &leaves[i + 1..] {
                assert!(!a.bounds.intersects(&b.bounds), "{:?} overlaps {:?}", a.bounds, b.bounds);
            }
        }
    }

    #[test]
    fn test_leaves_tile_root() {
        for seed in 0..20 {
            let mut rng = GenRng::new(seed);
            let tree = BspTree::build(GridRect::new(1, 1, 58, 28), &params(), &mut rng);
            assert!(tree.leaf_count() >= 2);
            assert_tiles(&tree);
        }
    }

    #[test]
    fn test_leaves_respect_min_size() {
        let mut rng = GenRng::new(42);
        let tree = BspTree::build(GridRect::new(0, 0, 120, 80), &params(), &mut rng);
        for leaf in tree.leaves() {
            assert!(leaf.bounds.width >= 10);
            assert!(leaf.bounds.height >= 10);
        }
    }

    #[test]
    fn test_max_depth_respected() {
        let mut rng = GenRng::new(42);
        let p = BspParams {
            max_depth: 2,
            ..params()
        };
        let tree = BspTree::build(GridRect::new(0, 0, 500, 500), &p, &mut rng);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn test_small_node_doesnt_split() {
        let mut rng = GenRng::new(42);
        let tree = BspTree::build(GridRect::new(0, 0, 19, 19), &params(), &mut rng);
        assert_eq!(tree.leaf_count(), 1);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_wide_node_splits_on_x() {
        let mut rng = GenRng::new(42);
        let p = BspParams {
            max_depth: 1,
            ..params()
        };
        let tree = BspTree::build(GridRect::new(0, 0, 80, 20), &p, &mut rng);
        let split = tree.root().split.expect("root should split");
        assert_eq!(split.axis, SplitAxis::X);
        assert!(split.at >= 10 && split.at <= 70);
    }

    #[test]
    fn test_zero_jitter_splits_at_midpoint() {
        let mut rng = GenRng::new(1);
        let p = BspParams {
            max_depth: 1,
            split_jitter: 0.0,
            ..params()
        };
        let tree = BspTree::build(GridRect::new(4, 0, 40, 10), &p, &mut rng);
        assert_eq!(tree.root().split.map(|s| s.at), Some(24));
    }
}
