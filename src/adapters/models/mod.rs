//! In-process classifier adapters.
//!
//! Every model here is fitted once on a scaled [`TrainingSet`] and then only
//! read, so the fitted values can be shared across request handlers.

mod boosting;
mod dataset;
mod forest;
mod knn;
mod logistic;
mod naive_bayes;
mod scaler;
mod tree;

pub use boosting::AdaBoost;
pub use dataset::TrainingSet;
pub use forest::{ForestParams, RandomForest};
pub use knn::KNearestNeighbors;
pub use logistic::{LogisticParams, LogisticRegression};
pub use naive_bayes::GaussianNaiveBayes;
pub use scaler::StandardScaler;
pub use tree::{DecisionTree, TreeParams};

use crate::ports::{BinaryClassifier, ClassifierError};

/// Names of the ensemble members, in evaluation order.
pub const MODEL_NAMES: [&str; 6] = [
    LogisticRegression::NAME,
    DecisionTree::NAME,
    KNearestNeighbors::NAME,
    GaussianNaiveBayes::NAME,
    AdaBoost::NAME,
    RandomForest::NAME,
];

/// Logistic function without overflow for large `|z|`.
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Fit the six ensemble members on already-scaled data.
///
/// # Errors
/// Returns the first `ClassifierError` raised while fitting a model.
pub fn train_ensemble(
    data: &TrainingSet,
    seed: u64,
) -> Result<Vec<Box<dyn BinaryClassifier>>, ClassifierError> {
    let models: Vec<Box<dyn BinaryClassifier>> = vec![
        Box::new(LogisticRegression::fit(data, LogisticParams::default())?),
        Box::new(DecisionTree::fit(data, TreeParams::default())?),
        Box::new(KNearestNeighbors::fit(data, KNearestNeighbors::DEFAULT_K)?),
        Box::new(GaussianNaiveBayes::fit(data)?),
        Box::new(AdaBoost::fit(data, AdaBoost::DEFAULT_ROUNDS)?),
        Box::new(RandomForest::fit(
            data,
            ForestParams {
                seed,
                ..ForestParams::default()
            },
        )?),
    ];

    for model in &models {
        tracing::info!("Trained model: {}", model.name());
    }
    Ok(models)
}
