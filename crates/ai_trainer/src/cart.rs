//! CART (Classification and Regression Tree) builder
//!
//! Implements deterministic exact-greedy regression tree construction with
//! fixed-point arithmetic only. Candidate thresholds are scanned over rows
//! sorted by feature value, so each node costs O(features * n log n).

use dyslexia_ai_core::gbdt::{Node, Tree};

use crate::deterministic::SplitTieBreaker;

/// Hessian of the squared loss for one sample, in gradient units
pub const HESSIAN_UNIT: i64 = 1000;

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// Width of the threshold buckets (1 = every distinct value)
    pub quant_step: i64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            min_samples_leaf: 1,
            quant_step: 1,
        }
    }
}

/// Split candidate with gain and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: i64,
    gain: i128,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn new(feature_idx: usize, threshold: i64, gain: i128, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            gain,
            tie_breaker: SplitTieBreaker::new(feature_idx, threshold, node_id),
        }
    }

    fn beats(&self, other: &SplitCandidate) -> bool {
        self.gain > other.gain || (self.gain == other.gain && self.tie_breaker < other.tie_breaker)
    }
}

/// Build a regression tree over gradients using exact-greedy CART
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<i64>],
    gradients: &'a [i64],
    hessians: &'a [i64],
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        features: &'a [Vec<i64>],
        gradients: &'a [i64],
        hessians: &'a [i64],
        config: TreeConfig,
    ) -> Self {
        assert_eq!(features.len(), gradients.len());
        assert_eq!(features.len(), hessians.len());

        let feature_count = features.first().map_or(0, Vec::len);

        Self {
            config,
            features,
            gradients,
            hessians,
            feature_count,
        }
    }

    /// Build the tree; `weight` is the shrinkage stored with it
    pub fn build(&self, weight: i64) -> Tree {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..self.features.len()).collect();

        self.build_node(&indices, 0, &mut nodes, 0);

        Tree::new(nodes, weight)
    }

    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>, node_id: usize) -> i32 {
        let current_idx = nodes.len() as i32;
        let min_leaf = self.config.min_samples_leaf.max(1);

        let split = if depth >= self.config.max_depth || indices.len() < 2 * min_leaf {
            None
        } else {
            self.find_best_split(indices, node_id)
        };

        let Some(split) = split else {
            nodes.push(Node::leaf(current_idx, self.calculate_leaf_value(indices)));
            return current_idx;
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        nodes.push(Node::internal(
            current_idx,
            split.feature_idx as i32,
            split.threshold,
            -1,
            -1,
        ));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes, node_id * 2 + 1);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes, node_id * 2 + 2);

        let node = &mut nodes[current_idx as usize];
        node.left = left_idx;
        node.right = right_idx;

        current_idx
    }

    /// Best positive-gain split over all features, if any
    fn find_best_split(&self, indices: &[usize], node_id: usize) -> Option<SplitCandidate> {
        let min_leaf = self.config.min_samples_leaf.max(1);
        let (g_total, h_total) = self.sum_gradients_hessians(indices);
        let parent_score = Self::score(g_total, h_total);

        let mut best: Option<SplitCandidate> = None;
        let mut sorted = indices.to_vec();

        for feature_idx in 0..self.feature_count {
            sorted.sort_by_key(|&i| (self.features[i][feature_idx], i));

            let mut g_left = 0i128;
            let mut h_left = 0i128;
            let mut pos = 0usize;

            while pos < sorted.len() {
                let bucket = self.quantize(self.features[sorted[pos]][feature_idx]);
                while pos < sorted.len() && self.quantize(self.features[sorted[pos]][feature_idx]) == bucket {
                    g_left += self.gradients[sorted[pos]] as i128;
                    h_left += self.hessians[sorted[pos]] as i128;
                    pos += 1;
                }

                let n_left = pos;
                let n_right = sorted.len() - pos;
                if n_right == 0 {
                    break;
                }
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let gain = Self::score(g_left, h_left) + Self::score(g_total - g_left, h_total - h_left)
                    - parent_score;
                if gain <= 0 {
                    continue;
                }

                let threshold = bucket.saturating_add(self.config.quant_step.max(1) - 1);
                let candidate = SplitCandidate::new(feature_idx, threshold, gain, node_id);
                if best.as_ref().map_or(true, |current| candidate.beats(current)) {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    fn quantize(&self, value: i64) -> i64 {
        let step = self.config.quant_step.max(1);
        value.div_euclid(step) * step
    }

    fn split_samples(&self, indices: &[usize], feature_idx: usize, threshold: i64) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .copied()
            .partition(|&idx| self.features[idx][feature_idx] <= threshold)
    }

    /// G²/H, the loss reduction term of a node
    fn score(g: i128, h: i128) -> i128 {
        if h > 0 {
            g * g / h
        } else {
            0
        }
    }

    fn sum_gradients_hessians(&self, indices: &[usize]) -> (i128, i128) {
        indices.iter().fold((0i128, 0i128), |(g, h), &idx| {
            (g + self.gradients[idx] as i128, h + self.hessians[idx] as i128)
        })
    }

    /// Optimal leaf value: -G/H, in gradient units
    fn calculate_leaf_value(&self, indices: &[usize]) -> i64 {
        let (sum_g, sum_h) = self.sum_gradients_hessians(indices);

        if sum_h == 0 {
            return 0;
        }

        let value = -(sum_g * HESSIAN_UNIT as i128) / sum_h;
        value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}
