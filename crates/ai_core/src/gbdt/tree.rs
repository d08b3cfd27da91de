//! Regression trees of the boosted ensemble
//!
//! Nodes are stored in a flat vector with the root at index 0. Thresholds and
//! leaf values are micro-unit integers; traversal goes left when
//! `feature <= threshold`.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// Leaves carry `feature_idx == -1`, `left == right == -1` and a `leaf` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    /// Position of the node in `Tree::nodes`
    pub id: i32,

    /// Left child index (-1 for leaves)
    pub left: i32,

    /// Right child index (-1 for leaves)
    pub right: i32,

    /// Feature column compared at this node (-1 for leaves)
    pub feature_idx: i32,

    /// Split threshold in micro units
    pub threshold: i64,

    /// Leaf output in micro units
    pub leaf: Option<i64>,
}

impl Node {
    pub fn internal(id: i32, feature_idx: i32, threshold: i64, left: i32, right: i32) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            leaf: None,
        }
    }

    pub fn leaf(id: i32, value: i64) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            leaf: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }
}

/// A single regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tree {
    pub nodes: Vec<Node>,

    /// Shrinkage applied to this tree's output (micro units, 100_000 = 0.1)
    pub weight: i64,
}

impl Tree {
    pub fn new(nodes: Vec<Node>, weight: i64) -> Self {
        Self { nodes, weight }
    }

    /// Raw leaf value reached by `features`.
    ///
    /// A malformed path (dangling child, feature out of range) yields zero.
    pub fn evaluate(&self, features: &[i64]) -> i64 {
        let mut idx = 0usize;

        while let Some(node) = self.nodes.get(idx) {
            if let Some(value) = node.leaf {
                return value;
            }

            let Some(&value) = usize::try_from(node.feature_idx)
                .ok()
                .and_then(|f| features.get(f))
            else {
                return 0;
            };

            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            match usize::try_from(next) {
                Ok(next) => idx = next,
                Err(_) => return 0,
            }
        }

        0
    }

    /// Leaf value already scaled by the tree weight
    pub fn contribution(&self, features: &[i64], scale: i64) -> i64 {
        let weighted = self.evaluate(features) as i128 * self.weight as i128;
        (weighted / scale as i128) as i64
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Check child links and feature indices against `feature_count`
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }

        let len = self.nodes.len() as i32;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                continue;
            }
            if node.left <= i as i32 || node.left >= len {
                return Err(format!("Node {} has invalid left child: {}", i, node.left));
            }
            if node.right <= i as i32 || node.right >= len {
                return Err(format!("Node {} has invalid right child: {}", i, node.right));
            }
            if node.feature_idx < 0 || node.feature_idx as usize >= feature_count {
                return Err(format!(
                    "Node {} splits on feature {} but the model has {} features",
                    i, node.feature_idx, feature_count
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        Tree::new(
            vec![
                Node::internal(0, 0, 50, 1, 2),
                Node::leaf(1, 100),
                Node::leaf(2, 200),
            ],
            1_000_000,
        )
    }

    #[test]
    fn test_node_creation() {
        let internal = Node::internal(0, 3, 12345, 1, 2);
        assert_eq!(internal.feature_idx, 3);
        assert!(!internal.is_leaf());

        let leaf = Node::leaf(1, -234);
        assert_eq!(leaf.feature_idx, -1);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.leaf, Some(-234));
    }

    #[test]
    fn test_tree_evaluation() {
        let tree = stump();
        assert_eq!(tree.evaluate(&[30]), 100);
        assert_eq!(tree.evaluate(&[50]), 100); // equal goes left
        assert_eq!(tree.evaluate(&[60]), 200);
    }

    #[test]
    fn test_missing_feature_yields_zero() {
        assert_eq!(stump().evaluate(&[]), 0);
    }

    #[test]
    fn test_contribution_applies_weight() {
        let mut tree = stump();
        tree.weight = 100_000;
        assert_eq!(tree.contribution(&[60], 1_000_000), 20);
    }

    #[test]
    fn test_tree_validation() {
        assert!(stump().validate(1).is_ok());
        assert!(stump().validate(0).is_err());

        let dangling = Tree::new(
            vec![
                Node::internal(0, 0, 50, 5, 2),
                Node::leaf(1, 100),
                Node::leaf(2, 200),
            ],
            1_000_000,
        );
        assert!(dangling.validate(1).is_err());

        assert!(Tree::new(vec![], 1_000_000).validate(1).is_err());
    }

    #[test]
    fn test_leaf_count() {
        assert_eq!(stump().leaf_count(), 2);
    }
}
