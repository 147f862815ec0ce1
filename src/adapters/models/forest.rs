//! Bagged ensemble of unpruned CART trees.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::dataset::TrainingSet;
use super::tree::{DecisionTree, TreeParams};
use crate::ports::{ensure_finite, BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};

#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub trees: usize,
    /// Features examined per split
    pub max_features: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_features: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub const NAME: &'static str = "random_forest";

    /// Grow each tree on a bootstrap resample, expressed as per-sample
    /// draw counts used as weights.
    ///
    /// # Errors
    /// Returns `ClassifierError::Training` if `params.trees` is zero.
    pub fn fit(data: &TrainingSet, params: ForestParams) -> Result<Self, ClassifierError> {
        if params.trees == 0 {
            return Err(ClassifierError::Training("forest needs at least one tree".into()));
        }

        let tree_params = TreeParams {
            max_depth: usize::MAX,
            min_samples_split: 2,
            max_features: Some(params.max_features),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let n = data.len();

        let trees = (0..params.trees)
            .map(|_| {
                let mut counts = vec![0.0; n];
                for _ in 0..n {
                    counts[rng.gen_range(0..n)] += 1.0;
                }
                let tree_rng = ChaCha8Rng::seed_from_u64(rng.gen());
                DecisionTree::fit_weighted(data, &counts, tree_params, Some(tree_rng))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { trees })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl BinaryClassifier for RandomForest {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, features: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
        ensure_finite(features)?;
        let p = self
            .trees
            .iter()
            .map(|t| t.positive_probability(features))
            .sum::<f64>()
            / self.trees.len() as f64;
        Ok(ClassifierOutput::with_probability(u8::from(p > 0.5), p))
    }
}
