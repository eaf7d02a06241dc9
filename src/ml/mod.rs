// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn-specific autoencoder code.
// Layers above it only see DenoisingAutoencoder, DaeConfig and
// host-side Matrix values.
//
// What's in this layer:
//
//   config.rs      — DaeConfig plus activation, initialiser and
//                    sampler-mode enums
//   noise.rs       — salt-and-pepper, masking and Gaussian
//                    corruption; Bernoulli resampling
//   layers.rs      — tied-weight encoder/decoder stack
//   graph.rs       — corrupted forward pass with walkback chain
//   loss.rs        — clipped binary cross-entropy objective
//   autoencoder.rs — the model instance: construct, transform,
//                    reconstruct, release
//   trainer.rs     — fit / partial_fit with Adam
//   sampler.rs     — pseudo-Gibbs sampling chain
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vincent et al. (2010) Stacked Denoising Autoencoders

pub mod config;
pub mod noise;
pub mod layers;
pub mod graph;
pub mod loss;
pub mod autoencoder;
pub mod trainer;
pub mod sampler;

/// Backend used by the application layer for training and inference.
#[cfg(not(feature = "wgpu"))]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

#[cfg(feature = "wgpu")]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
