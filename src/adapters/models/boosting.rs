//! AdaBoost (SAMME, two classes) over depth-1 decision stumps.

use super::dataset::TrainingSet;
use super::sigmoid;
use super::tree::{DecisionTree, TreeParams};
use crate::ports::{ensure_finite, BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};

#[derive(Debug, Clone)]
pub struct AdaBoost {
    stumps: Vec<(DecisionTree, f64)>,
}

impl AdaBoost {
    pub const NAME: &'static str = "adaboost";
    pub const DEFAULT_ROUNDS: usize = 50;

    /// Boost up to `rounds` stumps.
    ///
    /// A stump with zero weighted error ends boosting with unit weight. A
    /// stump no better than chance ends boosting, unless it is the first one.
    ///
    /// # Errors
    /// Returns `ClassifierError::Training` if `rounds` is zero or the first
    /// stump is no better than chance.
    pub fn fit(data: &TrainingSet, rounds: usize) -> Result<Self, ClassifierError> {
        if rounds == 0 {
            return Err(ClassifierError::Training("at least one round is required".into()));
        }

        let stump = TreeParams {
            max_depth: 1,
            ..TreeParams::default()
        };
        let n = data.len();
        let mut weights = vec![1.0 / n as f64; n];
        let mut stumps = Vec::with_capacity(rounds);

        for round in 0..rounds {
            let tree = DecisionTree::fit_weighted(data, &weights, stump, None)?;
            let missed: Vec<bool> = data
                .samples()
                .iter()
                .zip(data.labels())
                .map(|(x, &y)| tree.label(x) != y)
                .collect();
            let total: f64 = weights.iter().sum();
            let error = weights
                .iter()
                .zip(&missed)
                .filter(|(_, &m)| m)
                .map(|(w, _)| w)
                .sum::<f64>()
                / total;

            if error <= 0.0 {
                stumps.push((tree, 1.0));
                break;
            }
            if error >= 0.5 {
                if stumps.is_empty() {
                    return Err(ClassifierError::Training(format!(
                        "first stump error {error:.3} is no better than chance"
                    )));
                }
                tracing::debug!("AdaBoost stopped early at round {}", round);
                break;
            }

            let alpha = ((1.0 - error) / error).ln();
            for (w, &m) in weights.iter_mut().zip(&missed) {
                if m {
                    *w *= alpha.exp();
                }
            }
            let total: f64 = weights.iter().sum();
            for w in &mut weights {
                *w /= total;
            }
            stumps.push((tree, alpha));
        }

        Ok(Self { stumps })
    }

    /// Weighted vote normalized to `[-1, 1]`; positive favours class 1.
    fn decision(&self, x: &ScaledFeatures) -> f64 {
        let (score, total) = self
            .stumps
            .iter()
            .fold((0.0, 0.0), |(score, total), (tree, alpha)| {
                let vote = if tree.label(x) == 1 { *alpha } else { -alpha };
                (score + vote, total + alpha)
            });
        if total > 0.0 {
            score / total
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn rounds(&self) -> usize {
        self.stumps.len()
    }
}

impl BinaryClassifier for AdaBoost {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, features: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
        ensure_finite(features)?;
        let d = self.decision(features);
        Ok(ClassifierOutput::with_probability(u8::from(d > 0.0), sigmoid(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEATURE_COUNT;

    fn row(a: f64, b: f64) -> ScaledFeatures {
        let mut x = [0.0; FEATURE_COUNT];
        x[0] = a;
        x[1] = b;
        x
    }

    #[test]
    fn test_perfect_stump_stops_boosting() {
        let data = TrainingSet::new(
            vec![row(-2.0, 0.0), row(-1.0, 0.0), row(1.0, 0.0), row(2.0, 0.0)],
            vec![0, 0, 1, 1],
        )
        .expect("Valid");
        let model = AdaBoost::fit(&data, AdaBoost::DEFAULT_ROUNDS).expect("Fit");
        assert_eq!(model.rounds(), 1);

        let out = model.predict(&row(3.0, 0.0)).expect("Predict");
        assert_eq!(out.label, 1);
        assert_eq!(out.probability, Some(sigmoid(1.0)));
    }

    #[test]
    fn test_combines_stumps_for_or_rule() {
        // Positive when either coordinate is high: no single stump fits.
        let mut samples = Vec::new();
        let mut labels = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                samples.push(row(a as f64, b as f64));
                labels.push(u8::from(a >= 2 || b >= 2));
            }
        }
        let data = TrainingSet::new(samples, labels).expect("Valid");
        let model = AdaBoost::fit(&data, AdaBoost::DEFAULT_ROUNDS).expect("Fit");
        assert!(model.rounds() > 1);

        assert_eq!(model.predict(&row(0.0, 0.0)).expect("Predict").label, 0);
        assert_eq!(model.predict(&row(3.0, 0.0)).expect("Predict").label, 1);
        assert_eq!(model.predict(&row(0.0, 3.0)).expect("Predict").label, 1);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let data = TrainingSet::new(vec![row(0.0, 0.0), row(1.0, 0.0)], vec![0, 1]).expect("Valid");
        assert!(AdaBoost::fit(&data, 0).is_err());
    }
}
