// ============================================================
// Layer 5 — Training Graph (walkback assembly)
// ============================================================
// Builds the forward computation for one training batch.
//
// Without walkback (K = 0):
//   x → corrupt → stack → (z, y)          chain = [y]
//
// With walkback (K > 0), for i in 0..K:
//   i = 0 : input = x
//   i > 0 : input ~ Bernoulli(y_{i-1})    (detached sample)
//   input → corrupt → stack → (z_i, y_i)  chain.push(y_i)
//
// Every step shares the same parameters. The caller gets the
// last step's latent and reconstruction plus the whole chain,
// each element of which contributes to the loss.
//
// Reference: Bengio, Yao, Alain & Vincent (2013)
//            Generalized Denoising Auto-Encoders as Generative Models

use burn::prelude::*;
use rand::Rng;

use crate::domain::corruption::Corruption;
use crate::error::Result;
use crate::ml::config::Activation;
use crate::ml::layers::TiedAutoencoder;
use crate::ml::noise::{bernoulli_sample, corrupt};

/// Outputs of one training forward pass.
pub struct ForwardPass<B: Backend> {
    /// Latent code of the last chain step, [batch, latent]
    pub latent: Tensor<B, 2>,
    /// Reconstruction of the last chain step, [batch, n_input]
    pub reconstruction: Tensor<B, 2>,
    /// One reconstruction per walkback step (length 1 without walkback)
    pub chain: Vec<Tensor<B, 2>>,
}

/// Run the corrupted forward pass, repeated over `walkbacks` steps.
pub fn walkback_chain<B: Backend, R: Rng>(
    model:      &TiedAutoencoder<B>,
    input:      Tensor<B, 2>,
    corruption: &Corruption,
    walkbacks:  usize,
    activation: &Activation,
    rng:        &mut R,
) -> Result<ForwardPass<B>> {
    let steps = walkbacks.max(1);

    let (mut latent, first) = corrupted_step(model, input, corruption, activation, rng)?;
    let mut reconstruction = first.clone();
    let mut chain = Vec::with_capacity(steps);
    chain.push(first);

    for _ in 1..steps {
        let sample = bernoulli_sample(reconstruction, rng);
        let (z, y) = corrupted_step(model, sample, corruption, activation, rng)?;
        latent = z;
        reconstruction = y.clone();
        chain.push(y);
    }

    Ok(ForwardPass { latent, reconstruction, chain })
}

fn corrupted_step<B: Backend, R: Rng>(
    model:      &TiedAutoencoder<B>,
    input:      Tensor<B, 2>,
    corruption: &Corruption,
    activation: &Activation,
    rng:        &mut R,
) -> Result<(Tensor<B, 2>, Tensor<B, 2>)> {
    let corrupted = corrupt(input, corruption, rng)?;
    Ok(model.forward(corrupted, activation))
}
