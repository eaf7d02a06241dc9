// ============================================================
// Layer 2 — Sample / Reconstruct Use Case
// ============================================================
// Inference workflows on a trained checkpoint:
//
//   sample:      seeds.csv → pseudo-Gibbs chain → samples.csv
//   reconstruct: data.csv  → clean pass        → output.csv
//
// The model is loaded once and reused for every call. Sampling
// mode and seed can be overridden without retraining; they do
// not touch the layer layout.

use anyhow::{Context, Result};
use burn::prelude::*;
use std::path::{Path, PathBuf};

use crate::data::{loader::CsvLoader, writer::CsvWriter};
use crate::domain::{
    matrix::Matrix,
    traits::{DataSink, DataSource},
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{autoencoder::DenoisingAutoencoder, config::SampleMode, TrainBackend};

/// Settings applied on top of the saved model config.
#[derive(Debug, Clone, Default)]
pub struct InferenceOverrides {
    pub sample_mode: Option<SampleMode>,
    pub seed:        Option<u64>,
}

pub struct SampleUseCase {
    dae: DenoisingAutoencoder<TrainBackend>,
}

impl SampleUseCase {
    pub fn new(checkpoint_dir: impl Into<PathBuf>, overrides: InferenceOverrides) -> Result<Self> {
        let ckpt = CheckpointManager::new(checkpoint_dir.into())?;

        let mut config = ckpt.load_config()?;
        if let Some(mode) = overrides.sample_mode {
            config.sample_mode = mode;
        }
        if let Some(seed) = overrides.seed {
            config.seed = seed;
        }

        let device = <TrainBackend as Backend>::Device::default();
        let dae = ckpt.load_with_config::<TrainBackend>(config, &device)?;
        Ok(Self { dae })
    }

    /// Generate `count` rows from seeds in `seeds_path`, written to `output`.
    pub fn sample(&mut self, seeds_path: &Path, count: usize, output: &Path) -> Result<Matrix> {
        let seeds = CsvLoader::new(seeds_path).load()?;
        let samples = self
            .dae
            .sample(&seeds, count)
            .with_context(|| format!("Sampling from seeds in '{}' failed", seeds_path.display()))?;

        CsvWriter::new(output).save(&samples)?;
        tracing::info!("Wrote {} samples to '{}'", samples.rows(), output.display());
        Ok(samples)
    }

    /// Reconstruct every row of `data_path`, written to `output`.
    pub fn reconstruct(&self, data_path: &Path, output: &Path) -> Result<Matrix> {
        let data = CsvLoader::new(data_path).load()?;
        let recon = self
            .dae
            .reconstruct(&data)
            .with_context(|| format!("Reconstructing '{}' failed", data_path.display()))?;

        CsvWriter::new(output).save(&recon)?;
        tracing::info!("Wrote {} reconstructions to '{}'", recon.rows(), output.display());
        Ok(recon)
    }

    pub fn model(&self) -> &DenoisingAutoencoder<TrainBackend> {
        &self.dae
    }

    pub fn finish(self) {
        self.dae.release();
    }
}
