// ============================================================
// Layer 5 — Reconstruction Loss
// ============================================================
// Per-sample binary cross-entropy against the *clean* input:
//
//   L(y, x) = -Σ_j [ x_j·log(y_j) + (1-x_j)·log(1-y_j) ]
//
// with y clipped to [ε, 1-ε]. In f32, 1 - 1e-10 rounds to 1, so
// the complement 1-y is floored at ε separately.
//
// Objective = batch mean of L, summed over every walkback step.

use burn::prelude::*;

/// Lower clip bound for probabilities fed to `log`.
pub const CLIP_EPSILON: f64 = 1e-10;

/// Per-sample BCE summed over features, shape [batch, 1].
pub fn binary_cross_entropy<B: Backend>(output: Tensor<B, 2>, target: Tensor<B, 2>) -> Tensor<B, 2> {
    let output     = output.clamp(CLIP_EPSILON, 1.0 - CLIP_EPSILON);
    let complement = output.clone().neg().add_scalar(1.0).clamp_min(CLIP_EPSILON);
    let target_complement = target.clone().neg().add_scalar(1.0);

    (target * output.log() + target_complement * complement.log())
        .sum_dim(1)
        .neg()
}

/// Scalar training objective for a reconstruction chain.
///
/// Per-sample losses of every chain step are added elementwise before
/// taking the batch mean, so each step weighs equally.
pub fn chain_objective<B: Backend>(chain: &[Tensor<B, 2>], target: Tensor<B, 2>) -> Tensor<B, 1> {
    let per_sample = chain
        .iter()
        .map(|y| binary_cross_entropy(y.clone(), target.clone()))
        .reduce(|acc, loss| acc + loss);

    match per_sample {
        Some(loss) => loss.mean(),
        None       => Tensor::zeros([1], &target.device()),
    }
}
