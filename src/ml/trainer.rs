// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch training for DenoisingAutoencoder.
//
// One epoch:
//   1. row order = shuffled permutation (instance RNG) or 0..n
//   2. split into *full* batches of batch_size rows
//   3. per batch: fresh corruption (+ walkback), one Adam step
//   4. avg_cost += cost · batch_size / n_samples
//
// Key Burn insight:
//   - The module lives on the AutodiffBackend so loss.backward()
//     yields gradients for every Param, the shared encoder
//     weights included (they receive the decoder's gradient too)
//   - optim.step() consumes the module and returns the updated one
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use burn::{
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::data::batcher::full_batches;
use crate::domain::matrix::Matrix;
use crate::error::{DaeError, Result};
use crate::ml::autoencoder::DenoisingAutoencoder;
use crate::ml::graph::walkback_chain;
use crate::ml::loss::chain_objective;

/// Outcome of one training epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    /// Zero-based epoch index
    pub epoch:    usize,
    pub avg_cost: f64,
    /// Full batches processed (each one optimizer step)
    pub batches:  usize,
}

impl<B: AutodiffBackend> DenoisingAutoencoder<B> {
    /// Train for `num_epochs` epochs over `data`.
    ///
    /// `log_interval` overrides the configured interval for this call.
    pub fn fit(&mut self, data: &Matrix, shuffle: bool, log_interval: Option<usize>) -> Result<&mut Self> {
        self.check_width(data)?;
        let interval  = log_interval.or(self.config.log_interval);
        let n_samples = data.rows();
        let batch_size = self.config.batch_size;

        self.history.clear();
        let mut order: Vec<usize> = (0..n_samples).collect();

        for epoch in 0..self.config.num_epochs {
            if shuffle {
                order.shuffle(&mut self.rng);
            } else {
                order.sort_unstable();
            }

            let mut avg_cost = 0.0f64;
            let mut batches  = 0usize;

            for indices in full_batches(&order, batch_size) {
                let x = self.batcher.batch_rows(data, indices);
                let cost = self.step(x)?;
                avg_cost += cost * batch_size as f64 / n_samples as f64;
                batches  += 1;
            }

            if should_log(epoch, interval, batches) {
                tracing::info!("Epoch: {} cost: {:.4}", epoch + 1, avg_cost);
            }
            if batches > 0 {
                self.history.push(EpochSummary { epoch, avg_cost, batches });
            }
        }

        if self.history.is_empty() {
            tracing::debug!(
                "No full batch of {} rows in {} samples; parameters unchanged",
                batch_size,
                n_samples
            );
        }
        Ok(self)
    }

    /// One optimizer step on the whole of `batch`; returns its cost.
    pub fn partial_fit(&mut self, batch: &Matrix) -> Result<f64> {
        self.check_width(batch)?;
        if batch.rows() == 0 {
            return Err(DaeError::EmptyBatch);
        }
        let x = self.batcher.batch(batch);
        self.step(x)
    }

    fn step(&mut self, x: Tensor<B, 2>) -> Result<f64> {
        let pass = walkback_chain(
            &self.module,
            x.clone(),
            &self.corruption,
            self.config.walkbacks,
            &self.config.activation,
            &mut self.rng,
        )?;

        // Loss is always measured against the clean batch
        let loss = chain_objective(&pass.chain, x);
        let cost: f64 = loss.clone().into_scalar().elem::<f64>();

        // Backward pass + Adam update
        // m = β1*m + (1-β1)*g        (mean)
        // v = β2*v + (1-β2)*g²       (variance)
        // θ = θ - lr * m / (√v + ε)  (update)
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.module);
        self.module = self
            .optimizer
            .step(self.config.learning_rate, self.module.clone(), grads);
        self.steps += 1;

        Ok(cost)
    }
}

/// An epoch is logged when it trained at least one batch and falls on
/// the interval. `None` and `Some(0)` disable logging.
fn should_log(epoch: usize, interval: Option<usize>, batches: usize) -> bool {
    match interval {
        Some(every) if every > 0 => batches > 0 && epoch % every == 0,
        _ => false,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::corruption::CorruptionType;
    use crate::ml::config::DaeConfig;
    use approx::assert_abs_diff_eq;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    fn identity_rows() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]]).unwrap()
    }

    fn config() -> DaeConfig {
        DaeConfig::new(4, vec![2])
            .with_num_epochs(1)
            .with_batch_size(2)
            .with_corrupt_type(CorruptionType::Masking)
            .with_corrupt_prob(0.0)
    }

    fn model(cfg: DaeConfig) -> DenoisingAutoencoder<TestBackend> {
        DenoisingAutoencoder::new(cfg, &Default::default()).unwrap()
    }

    #[test]
    fn test_batch_sized_dataset_takes_one_step() {
        let mut dae = model(config());
        dae.fit(&identity_rows(), true, None).unwrap();
        assert_eq!(dae.steps(), 1);
        assert_eq!(dae.history().len(), 1);
        assert_eq!(dae.history()[0].batches, 1);
    }

    #[test]
    fn test_small_dataset_leaves_parameters_unchanged() {
        let mut dae = model(config().with_batch_size(3).with_num_epochs(5));
        let before = dae.reconstruct(&identity_rows()).unwrap();

        dae.fit(&identity_rows(), true, Some(1)).unwrap();

        assert_eq!(dae.steps(), 0);
        assert!(dae.history().is_empty());
        assert_eq!(dae.reconstruct(&identity_rows()).unwrap(), before);
    }

    #[test]
    fn test_identity_rows_scenario() {
        let mut dae = model(config());
        dae.fit(&identity_rows(), false, None).unwrap();

        let cost = dae.history()[0].avg_cost;
        assert!(cost.is_finite() && cost >= 0.0);

        let y = dae.reconstruct(&identity_rows()).unwrap();
        assert_eq!((y.rows(), y.cols()), (2, 4));
        assert!(y.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_partial_batch_is_dropped_each_epoch() {
        let data = Matrix::from_rows(vec![vec![0.0, 1.0, 0.0, 1.0]; 5]).unwrap();
        let mut dae = model(config().with_num_epochs(3));
        dae.fit(&data, true, None).unwrap();
        // 5 rows / batch 2 → 2 full batches per epoch
        assert_eq!(dae.steps(), 6);
        assert!(dae.history().iter().all(|s| s.batches == 2));
    }

    #[test]
    fn test_training_reduces_cost() {
        let mut dae = model(config().with_num_epochs(200).with_learning_rate(0.05));
        dae.fit(&identity_rows(), true, None).unwrap();
        let first = dae.history().first().unwrap().avg_cost;
        let last  = dae.history().last().unwrap().avg_cost;
        assert!(last < first, "cost went from {first} to {last}");
    }

    #[test]
    fn test_same_seed_gives_same_costs() {
        let cfg = config()
            .with_num_epochs(3)
            .with_corrupt_type(CorruptionType::SaltAndPepper)
            .with_corrupt_prob(0.3)
            .with_seed(17);
        let mut a = model(cfg.clone());
        let mut b = model(cfg);
        a.fit(&identity_rows(), true, None).unwrap();
        b.fit(&identity_rows(), true, None).unwrap();
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_walkback_training_runs() {
        let mut dae = model(
            config()
                .with_walkbacks(3)
                .with_corrupt_type(CorruptionType::SaltAndPepper)
                .with_corrupt_prob(0.2),
        );
        dae.fit(&identity_rows(), true, None).unwrap();
        assert_eq!(dae.steps(), 1);
        // Three chain steps each contribute a non-negative loss
        assert!(dae.history()[0].avg_cost.is_finite());
    }

    #[test]
    fn test_log_gate() {
        // Every 3rd epoch, counted from 0
        assert!(should_log(0, Some(3), 1));
        assert!(!should_log(1, Some(3), 1));
        assert!(!should_log(2, Some(3), 1));
        assert!(should_log(3, Some(3), 1));

        // No full batch, no log line
        assert!(!should_log(0, Some(1), 0));

        assert!(!should_log(0, None, 1));
        assert!(!should_log(0, Some(0), 1));
    }

    fn four_rows(order: [usize; 4]) -> Matrix {
        let rows = [
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 1.0, 0.0],
            vec![1.0, 1.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
        ];
        Matrix::from_rows(order.iter().map(|&i| rows[i].clone()).collect()).unwrap()
    }

    fn costs(dae: &DenoisingAutoencoder<TestBackend>) -> Vec<f64> {
        dae.history().iter().map(|s| s.avg_cost).collect()
    }

    #[test]
    fn test_no_shuffle_batches_rows_in_file_order() {
        let cfg = config().with_num_epochs(3).with_learning_rate(0.05);

        let mut base = model(cfg.clone());
        base.fit(&four_rows([0, 1, 2, 3]), false, None).unwrap();

        // Reordering rows inside each batch leaves every batch unchanged
        let mut within = model(cfg.clone());
        within.fit(&four_rows([1, 0, 3, 2]), false, None).unwrap();
        for (a, b) in costs(&base).iter().zip(costs(&within)) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
        }

        // Moving rows across batches changes what each step sees
        let mut across = model(cfg);
        across.fit(&four_rows([0, 2, 1, 3]), false, None).unwrap();
        assert_ne!(costs(&base), costs(&across));
    }

    #[test]
    fn test_partial_fit_is_one_step() {
        let mut dae = model(config());
        let cost = dae.partial_fit(&identity_rows()).unwrap();
        assert!(cost.is_finite() && cost >= 0.0);
        assert_eq!(dae.steps(), 1);
    }

    #[test]
    fn test_partial_fit_rejects_empty_and_wrong_width() {
        let mut dae = model(config());
        assert!(matches!(dae.partial_fit(&Matrix::zeros(0, 4)), Err(DaeError::EmptyBatch)));

        let narrow = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        assert!(matches!(
            dae.partial_fit(&narrow),
            Err(DaeError::ShapeMismatch { expected: 4, found: 2 })
        ));
        assert!(dae.fit(&narrow, true, None).is_err());
        assert_eq!(dae.steps(), 0);
    }
}
