// ============================================================
// Layer 5 — Noise Models
// ============================================================
// Corruption functions used to build the denoising task, plus
// the Bernoulli resampling used by walkback chains.
//
// All random draws come from the caller's RNG (owned by the
// model instance), are made on the host, then uploaded to the
// batch's device. A Bernoulli(p) draw succeeds when u < p for
// u ~ U[0, 1), so p = 0 never fires and p = 1 always does.
//
//   salt_and_pepper  x·a + b·(1-a)            a ~ B(1-rate), b ~ B(0.5)
//   masking          x·a                      a ~ B(1-rate)
//   gaussian         (x + ε)·p + x·(1-p)      ε ~ N(0, std)
//
// Reference: Vincent et al. (2010) Stacked Denoising Autoencoders

use burn::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::domain::corruption::Corruption;
use crate::error::{DaeError, Result};

/// Apply the given noise model to a batch.
pub fn corrupt<B: Backend, R: Rng>(
    x:          Tensor<B, 2>,
    corruption: &Corruption,
    rng:        &mut R,
) -> Result<Tensor<B, 2>> {
    match *corruption {
        Corruption::SaltAndPepper { rate }   => Ok(salt_and_pepper(x, rate, rng)),
        Corruption::Masking { rate }         => Ok(masking(x, rate, rng)),
        Corruption::Gaussian { std, mix_prob } => gaussian(x, std, mix_prob, rng),
    }
}

/// Replace a `rate` fraction of elements with a fair coin flip of 0 or 1.
pub fn salt_and_pepper<B: Backend, R: Rng>(x: Tensor<B, 2>, rate: f64, rng: &mut R) -> Tensor<B, 2> {
    let shape  = x.dims();
    let device = x.device();

    let keep = bernoulli_mask::<B, R>(shape, 1.0 - rate, rng, &device);
    let coin = bernoulli_mask::<B, R>(shape, 0.5, rng, &device);
    let replaced = keep.clone().neg().add_scalar(1.0);

    x * keep + coin * replaced
}

/// Force a `rate` fraction of elements to zero.
pub fn masking<B: Backend, R: Rng>(x: Tensor<B, 2>, rate: f64, rng: &mut R) -> Tensor<B, 2> {
    let keep = bernoulli_mask::<B, R>(x.dims(), 1.0 - rate, rng, &x.device());
    x * keep
}

/// Blend a Gaussian-perturbed copy with the clean input.
///
/// `mix_prob` weights the whole perturbed copy; it is not a per-element
/// selection probability.
pub fn gaussian<B: Backend, R: Rng>(
    x:        Tensor<B, 2>,
    std:      f64,
    mix_prob: f64,
    rng:      &mut R,
) -> Result<Tensor<B, 2>> {
    let noise = normal_tensor::<B, R>(x.dims(), std, rng, &x.device())?;
    let perturbed = x.clone() + noise;
    Ok(perturbed.mul_scalar(mix_prob) + x.mul_scalar(1.0 - mix_prob))
}

/// Draw a binary tensor with per-element success probabilities `probs`.
///
/// The draw is detached from the autodiff graph.
pub fn bernoulli_sample<B: Backend, R: Rng>(probs: Tensor<B, 2>, rng: &mut R) -> Tensor<B, 2> {
    let uniform = uniform_tensor::<B, R>(probs.dims(), rng, &probs.device());
    uniform.lower(probs.detach()).float()
}

// ─── Host-side random tensors ─────────────────────────────────────────────────

fn bernoulli_mask<B: Backend, R: Rng>(
    shape:  [usize; 2],
    p:      f64,
    rng:    &mut R,
    device: &B::Device,
) -> Tensor<B, 2> {
    let values: Vec<f32> = (0..shape[0] * shape[1])
        .map(|_| if rng.gen::<f64>() < p { 1.0 } else { 0.0 })
        .collect();
    Tensor::<B, 1>::from_floats(values.as_slice(), device).reshape(shape)
}

fn uniform_tensor<B: Backend, R: Rng>(
    shape:  [usize; 2],
    rng:    &mut R,
    device: &B::Device,
) -> Tensor<B, 2> {
    let values: Vec<f32> = (0..shape[0] * shape[1]).map(|_| rng.gen::<f32>()).collect();
    Tensor::<B, 1>::from_floats(values.as_slice(), device).reshape(shape)
}

fn normal_tensor<B: Backend, R: Rng>(
    shape:  [usize; 2],
    std:    f64,
    rng:    &mut R,
    device: &B::Device,
) -> Result<Tensor<B, 2>> {
    let values = normal_values(shape[0] * shape[1], std, rng)?;
    Ok(Tensor::<B, 1>::from_floats(values.as_slice(), device).reshape(shape))
}

fn normal_values<R: Rng>(n: usize, std: f64, rng: &mut R) -> Result<Vec<f32>> {
    let normal = Normal::new(0.0, std)
        .map_err(|e| DaeError::InvalidConfig(format!("gaussian noise std {std}: {e}")))?;
    Ok((0..n).map(|_| normal.sample(rng) as f32).collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use rand::{rngs::StdRng, SeedableRng};

    type TestBackend = NdArray;

    fn input() -> Tensor<TestBackend, 2> {
        Tensor::<TestBackend, 2>::from_floats(
            [[0.2, 0.9, 0.0, 1.0], [0.5, 0.1, 0.7, 0.3]],
            &Default::default(),
        )
    }

    fn values(t: Tensor<TestBackend, 2>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_masking_rate_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(values(masking(input(), 0.0, &mut rng)), values(input()));
    }

    #[test]
    fn test_masking_rate_one_zeroes_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(values(masking(input(), 1.0, &mut rng)).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_salt_and_pepper_rate_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(values(salt_and_pepper(input(), 0.0, &mut rng)), values(input()));
    }

    #[test]
    fn test_salt_and_pepper_rate_one_gives_binary_values() {
        // Unlike masking, replaced elements are 0 or 1, not always 0
        let x = Tensor::<TestBackend, 2>::full([16, 16], 0.5, &Default::default());
        let mut rng = StdRng::seed_from_u64(3);
        let out = values(salt_and_pepper(x, 1.0, &mut rng));

        assert!(out.iter().all(|&v| v == 0.0 || v == 1.0));
        assert!(out.iter().any(|&v| v == 1.0));
        assert!(out.iter().any(|&v| v == 0.0));
    }

    #[test]
    fn test_gaussian_prob_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(4);
        let out = values(gaussian(input(), 1.0, 0.0, &mut rng).unwrap());
        for (a, b) in out.iter().zip(values(input())) {
            approx::assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gaussian_prob_one_is_pure_perturbed_copy() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = values(gaussian(input(), 0.3, 1.0, &mut rng).unwrap());

        // Replay the same draws to rebuild x + noise by hand
        let mut replay = StdRng::seed_from_u64(5);
        let noise = normal_values(8, 0.3, &mut replay).unwrap();
        let expected: Vec<f32> = values(input()).iter().zip(&noise).map(|(x, n)| x + n).collect();

        for (a, b) in out.iter().zip(expected) {
            approx::assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_corrupt_is_reproducible_for_a_seed() {
        let c = Corruption::SaltAndPepper { rate: 0.5 };
        let a = corrupt(input(), &c, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = corrupt(input(), &c, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(values(a), values(b));
    }

    #[test]
    fn test_bernoulli_sample_extremes() {
        let device = Default::default();
        let mut rng = StdRng::seed_from_u64(6);

        let ones = Tensor::<TestBackend, 2>::ones([3, 5], &device);
        assert!(values(bernoulli_sample(ones, &mut rng)).iter().all(|&v| v == 1.0));

        let zeros = Tensor::<TestBackend, 2>::zeros([3, 5], &device);
        assert!(values(bernoulli_sample(zeros, &mut rng)).iter().all(|&v| v == 0.0));
    }
}
