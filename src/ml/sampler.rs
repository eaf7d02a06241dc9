// ============================================================
// Layer 5 — Pseudo-Gibbs Sampler
// ============================================================
// Generates a chain of `count` rows from a trained model:
//
//   row 0 = reconstruct(seed)        seed picked uniformly at random
//   row i = reconstruct(step(row i-1))
//
// where `step` depends on SampleMode:
//   Reconstruct  identity (deterministic; settles on a fixed point)
//   Bernoulli    binary sample of the previous reconstruction
//   Corrupt      the configured noise model, also applied to the seed
//
// Each reconstruction is a clean pass on the inner backend.

use burn::{module::AutodiffModule, prelude::*, tensor::backend::AutodiffBackend};
use rand::Rng;

use crate::data::batcher::to_matrix;
use crate::domain::matrix::Matrix;
use crate::error::{DaeError, Result};
use crate::ml::autoencoder::DenoisingAutoencoder;
use crate::ml::config::SampleMode;
use crate::ml::noise::{bernoulli_sample, corrupt};

impl<B: AutodiffBackend> DenoisingAutoencoder<B> {
    /// Run a sampling chain of `count` rows started from one of `seeds`.
    pub fn sample(&mut self, seeds: &Matrix, count: usize) -> Result<Matrix> {
        if seeds.rows() == 0 {
            return Err(DaeError::EmptySeedSet);
        }
        self.check_width(seeds)?;

        let n_input = self.config.n_input;
        if count == 0 {
            return Ok(Matrix::zeros(0, n_input));
        }

        let pick = self.rng.gen_range(0..seeds.rows());
        tracing::debug!(
            "Sampling {} rows from seed {} of {} ({:?} mode)",
            count,
            pick,
            seeds.rows(),
            self.config.sample_mode
        );

        let model   = self.module.valid();
        let batcher = self.inference_batcher();
        let mut current = batcher.batch_rows(seeds, &[pick]);
        let mut rows = Vec::with_capacity(count * n_input);

        for i in 0..count {
            let input = match self.config.sample_mode {
                SampleMode::Reconstruct              => current,
                SampleMode::Bernoulli if i > 0       => bernoulli_sample(current, &mut self.rng),
                SampleMode::Bernoulli                => current,
                SampleMode::Corrupt                  => corrupt(current, &self.corruption, &mut self.rng)?,
            };
            let (_, y) = model.forward(input, &self.config.activation);
            rows.extend_from_slice(to_matrix(y.clone())?.as_slice());
            current = y;
        }

        Matrix::new(count, n_input, rows)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::config::DaeConfig;
    use approx::assert_abs_diff_eq;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    fn model(mode: SampleMode) -> DenoisingAutoencoder<TestBackend> {
        let cfg = DaeConfig::new(4, vec![3]).with_sample_mode(mode).with_seed(3);
        DenoisingAutoencoder::new(cfg, &Default::default()).unwrap()
    }

    fn seed_row() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 0.0, 1.0, 0.0]]).unwrap()
    }

    #[test]
    fn test_sample_returns_count_rows() {
        let mut dae = model(SampleMode::Reconstruct);
        let out = dae.sample(&seed_row(), 3).unwrap();
        assert_eq!((out.rows(), out.cols()), (3, 4));
    }

    #[test]
    fn test_reconstruct_mode_chains_reconstructions() {
        let mut dae = model(SampleMode::Reconstruct);
        let out = dae.sample(&seed_row(), 3).unwrap();

        let first = dae.reconstruct(&seed_row()).unwrap();
        for (a, b) in out.row(0).iter().zip(first.as_slice()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
        for i in 0..2 {
            let prev = out.select_rows(&[i]);
            let next = dae.reconstruct(&prev).unwrap();
            for (a, b) in out.row(i + 1).iter().zip(next.as_slice()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_stochastic_modes_stay_in_unit_interval() {
        for mode in [SampleMode::Bernoulli, SampleMode::Corrupt] {
            let mut dae = model(mode);
            let out = dae.sample(&seed_row(), 5).unwrap();
            assert_eq!(out.rows(), 5);
            assert!(out.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_empty_seed_set_is_an_error() {
        let mut dae = model(SampleMode::Reconstruct);
        assert!(matches!(dae.sample(&Matrix::zeros(0, 4), 3), Err(DaeError::EmptySeedSet)));
    }

    #[test]
    fn test_zero_count_gives_empty_matrix() {
        let mut dae = model(SampleMode::Reconstruct);
        let out = dae.sample(&seed_row(), 0).unwrap();
        assert_eq!((out.rows(), out.cols()), (0, 4));
    }

    #[test]
    fn test_wrong_seed_width_is_rejected() {
        let mut dae = model(SampleMode::Reconstruct);
        let seeds = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        assert!(matches!(dae.sample(&seeds, 2), Err(DaeError::ShapeMismatch { .. })));
    }
}
