//! Seeded synthetic training data.
//!
//! Features are independent standard normals; a sample is labeled positive
//! when an elevated heart-rate, depressed SpO2 or elevated distress axis
//! crosses its cut-off.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::models::TrainingSet;
use crate::domain::FEATURE_COUNT;
use crate::ports::{ClassifierError, ScaledFeatures};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_SAMPLES: usize = 500;

/// One standard-normal draw (Box-Muller, cosine branch).
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    // gen::<f64>() is in [0, 1); flip it so ln never sees zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn label(x: &ScaledFeatures) -> u8 {
    u8::from(x[0] > 0.5 || x[1] < -0.5 || x[4] > 0.7)
}

/// Draw `samples` labeled rows from a generator seeded with `seed`.
///
/// # Errors
/// Returns `ClassifierError::Training` if the draw does not contain both
/// classes (only plausible for very small `samples`).
pub fn generate(seed: u64, samples: usize) -> Result<TrainingSet, ClassifierError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows: Vec<ScaledFeatures> = (0..samples)
        .map(|_| {
            let mut x = [0.0; FEATURE_COUNT];
            for v in &mut x {
                *v = standard_normal(&mut rng);
            }
            x
        })
        .collect();
    let labels = rows.iter().map(label).collect();

    let set = TrainingSet::new(rows, labels)?;
    tracing::debug!(
        "Generated {} synthetic samples ({} positive)",
        set.len(),
        set.positives()
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(DEFAULT_SEED, 50).expect("Generate");
        let b = generate(DEFAULT_SEED, 50).expect("Generate");
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn test_different_seed_different_data() {
        let a = generate(1, 50).expect("Generate");
        let b = generate(2, 50).expect("Generate");
        assert_ne!(a.samples(), b.samples());
    }

    #[test]
    fn test_labels_follow_rule() {
        let set = generate(DEFAULT_SEED, DEFAULT_SAMPLES).expect("Generate");
        for (x, &y) in set.samples().iter().zip(set.labels()) {
            assert_eq!(label(x), y);
        }
        // Roughly 64% positives for independent standard normals.
        let rate = set.positives() as f64 / set.len() as f64;
        assert!((0.5..0.8).contains(&rate));
    }

    #[test]
    fn test_moments_are_near_standard() {
        let set = generate(DEFAULT_SEED, 2000).expect("Generate");
        let (mean, var) = set.moments();
        for i in 0..FEATURE_COUNT {
            assert!(mean[i].abs() < 0.15);
            assert!((var[i] - 1.0).abs() < 0.2);
        }
    }
}
