//! CART decision tree with weighted Gini impurity.
//!
//! Also the base learner of [`super::AdaBoost`] (depth-1 stumps with sample
//! weights) and [`super::RandomForest`] (bootstrap weights and per-split
//! feature subsampling).

use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use super::dataset::TrainingSet;
use crate::domain::FEATURE_COUNT;
use crate::ports::{ensure_finite, BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};

/// Growth limits.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features examined per split; `None` examines all of them
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        positive_fraction: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    pub const NAME: &'static str = "decision_tree";

    /// Fit with uniform sample weights.
    ///
    /// # Errors
    /// Propagates errors from [`DecisionTree::fit_weighted`].
    pub fn fit(data: &TrainingSet, params: TreeParams) -> Result<Self, ClassifierError> {
        let weights = vec![1.0; data.len()];
        Self::fit_weighted(data, &weights, params, None)
    }

    /// Fit with per-sample weights; zero-weight samples are left out.
    ///
    /// `rng` is only consulted when `params.max_features` restricts the
    /// features examined per split.
    ///
    /// # Errors
    /// Returns `ClassifierError::Training` if the weights do not line up with
    /// the data or none is positive.
    pub fn fit_weighted(
        data: &TrainingSet,
        weights: &[f64],
        params: TreeParams,
        rng: Option<ChaCha8Rng>,
    ) -> Result<Self, ClassifierError> {
        if weights.len() != data.len() {
            return Err(ClassifierError::Training(format!(
                "{} weights for {} samples",
                weights.len(),
                data.len()
            )));
        }
        let indices: Vec<usize> = (0..data.len())
            .filter(|&i| weights[i].is_finite() && weights[i] > 0.0)
            .collect();
        if indices.is_empty() {
            return Err(ClassifierError::Training("no sample has positive weight".into()));
        }

        let mut builder = TreeBuilder {
            data,
            weights,
            params,
            rng,
        };
        let root = builder.grow(indices, 0);
        Ok(Self { root })
    }

    /// Weighted fraction of positives in the leaf reached by `x`.
    #[must_use]
    pub fn positive_probability(&self, x: &ScaledFeatures) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { positive_fraction } => return *positive_fraction,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Hard label; ties go to the negative class.
    #[must_use]
    pub fn label(&self, x: &ScaledFeatures) -> u8 {
        u8::from(self.positive_probability(x) > 0.5)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl BinaryClassifier for DecisionTree {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, features: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
        ensure_finite(features)?;
        let p = self.positive_probability(features);
        Ok(ClassifierOutput::with_probability(u8::from(p > 0.5), p))
    }
}

struct TreeBuilder<'a> {
    data: &'a TrainingSet,
    weights: &'a [f64],
    params: TreeParams,
    rng: Option<ChaCha8Rng>,
}

struct Split {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

fn gini(total: f64, positive: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let p = positive / total;
    2.0 * p * (1.0 - p)
}

impl TreeBuilder<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> Node {
        let (total, positive) = self.class_weights(&indices);
        let positive_fraction = if total > 0.0 { positive / total } else { 0.0 };

        let positives = indices.iter().filter(|&&i| self.data.labels()[i] == 1).count();
        let pure = positives == 0 || positives == indices.len();
        if pure || depth >= self.params.max_depth || indices.len() < self.params.min_samples_split {
            return Node::Leaf { positive_fraction };
        }

        match self.best_split(&indices, total, positive) {
            Some(split) => {
                let left = self.grow(split.left, depth + 1);
                let right = self.grow(split.right, depth + 1);
                Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            None => Node::Leaf { positive_fraction },
        }
    }

    fn class_weights(&self, indices: &[usize]) -> (f64, f64) {
        indices.iter().fold((0.0, 0.0), |(total, positive), &i| {
            let w = self.weights[i];
            if self.data.labels()[i] == 1 {
                (total + w, positive + w)
            } else {
                (total + w, positive)
            }
        })
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        match (self.params.max_features, self.rng.as_mut()) {
            (Some(k), Some(rng)) if k > 0 && k < FEATURE_COUNT => {
                index::sample(rng, FEATURE_COUNT, k).into_vec()
            }
            _ => (0..FEATURE_COUNT).collect(),
        }
    }

    /// Lowest weighted child impurity over candidate thresholds; `None` when
    /// no threshold improves on the parent.
    fn best_split(&mut self, indices: &[usize], total: f64, positive: f64) -> Option<Split> {
        let data = self.data;
        let samples = data.samples();
        let labels = data.labels();
        let parent_impurity = gini(total, positive) * total;

        let mut best: Option<(usize, f64, f64)> = None;
        for feature in self.candidate_features() {
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| samples[a][feature].total_cmp(&samples[b][feature]));

            let mut left_total = 0.0;
            let mut left_positive = 0.0;
            for pair in order.windows(2) {
                let (i, next) = (pair[0], pair[1]);
                left_total += self.weights[i];
                if labels[i] == 1 {
                    left_positive += self.weights[i];
                }

                let here = samples[i][feature];
                let above = samples[next][feature];
                if above <= here {
                    continue;
                }

                let impurity = gini(left_total, left_positive) * left_total
                    + gini(total - left_total, positive - left_positive) * (total - left_total);
                if best.map_or(true, |(_, _, b)| impurity < b) {
                    let mut threshold = here + (above - here) / 2.0;
                    if threshold >= above {
                        threshold = here;
                    }
                    best = Some((feature, threshold, impurity));
                }
            }
        }

        let (feature, threshold, impurity) = best?;
        if impurity >= parent_impurity - 1e-12 {
            return None;
        }

        let (left, right) = indices
            .iter()
            .copied()
            .partition(|&i| samples[i][feature] <= threshold);
        Some(Split {
            feature,
            threshold,
            left,
            right,
        })
    }
}
