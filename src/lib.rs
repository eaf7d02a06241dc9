#![recursion_limit = "256"]

//! Denoising autoencoder with tied weights, walkback training and a
//! pseudo-Gibbs sampler, built on Burn.
//!
//! Layers, outermost first:
//!
//! 1. `cli`         — clap commands
//! 2. `application` — train / sample / reconstruct workflows
//! 3. `domain`      — plain data types and traits
//! 4. `data`        — CSV I/O and tensor batching
//! 5. `ml`          — the model, its training loop and sampler
//! 6. `infra`       — checkpoints and metrics

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
pub mod error;

pub use domain::{corruption::CorruptionType, matrix::Matrix};
pub use error::{DaeError, Result};
pub use ml::{
    autoencoder::DenoisingAutoencoder,
    config::{Activation, BiasInit, DaeConfig, SampleMode, WeightInit},
    trainer::EpochSummary,
};
