// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a training run in order:
//
//   Step 1: Load the CSV dataset       (Layer 4 - data)
//   Step 2: Build the model config     (Layer 5 - ml)
//   Step 3: Construct the model        (Layer 5 - ml)
//   Step 4: Fit                        (Layer 5 - ml)
//   Step 5: Save checkpoint + metrics  (Layer 6 - infra)
//   Step 6: Release the model          (Layer 5 - ml)

use anyhow::{Context, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::loader::CsvLoader;
use crate::domain::{corruption::CorruptionType, traits::DataSource};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    autoencoder::DenoisingAutoencoder,
    config::{Activation, DaeConfig, SampleMode},
    trainer::EpochSummary,
    TrainBackend,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run needs. The model's input width is not
// part of it; it is taken from the loaded data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:      PathBuf,
    pub checkpoint_dir: PathBuf,
    pub hidden_dims:    Vec<usize>,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub corrupt_type:   String,
    pub corrupt_prob:   f64,
    pub corrupt_std:    f64,
    pub walkbacks:      usize,
    pub activation:     Activation,
    pub lr:             f64,
    pub log_every:      Option<usize>,
    pub sample_mode:    SampleMode,
    pub seed:           u64,
    pub shuffle:        bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:      PathBuf::from("data/train.csv"),
            checkpoint_dir: PathBuf::from("checkpoints"),
            hidden_dims:    vec![100],
            epochs:         1000,
            batch_size:     100,
            corrupt_type:   "salt_and_pepper".to_string(),
            corrupt_prob:   0.5,
            corrupt_std:    0.25,
            walkbacks:      0,
            activation:     Activation::Sigmoid,
            lr:             0.001,
            log_every:      Some(1),
            sample_mode:    SampleMode::Reconstruct,
            seed:           0,
            shuffle:        true,
        }
    }
}

impl TrainConfig {
    /// Model hyperparameters for data rows of width `n_input`.
    pub fn model_config(&self, n_input: usize) -> DaeConfig {
        DaeConfig::new(n_input, self.hidden_dims.clone())
            .with_num_epochs(self.epochs)
            .with_batch_size(self.batch_size)
            .with_corrupt_type(CorruptionType::from(self.corrupt_type.as_str()))
            .with_corrupt_prob(self.corrupt_prob)
            .with_corrupt_std(self.corrupt_std)
            .with_walkbacks(self.walkbacks)
            .with_activation(self.activation)
            .with_learning_rate(self.lr)
            .with_log_interval(self.log_every)
            .with_sample_mode(self.sample_mode)
            .with_seed(self.seed)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline; returns the summary of the last trained epoch.
    pub fn execute(&self) -> Result<Option<EpochSummary>> {
        let cfg = &self.config;

        // ── Step 1: Load the dataset ──────────────────────────────────────────
        let data = CsvLoader::new(&cfg.data_path).load()?;

        // ── Step 2: Model config, input width from the data ───────────────────
        let model_cfg = cfg.model_config(data.cols());

        // ── Step 3: Construct ─────────────────────────────────────────────────
        let device = <TrainBackend as Backend>::Device::default();
        tracing::info!("Using device: {:?}", device);
        let mut dae = DenoisingAutoencoder::<TrainBackend>::new(model_cfg, &device)
            .context("Cannot build the autoencoder")?;

        // ── Step 4: Fit ───────────────────────────────────────────────────────
        dae.fit(&data, cfg.shuffle, None)?;
        tracing::info!(
            "Training finished: {} epochs with updates, {} optimizer steps",
            dae.history().len(),
            dae.steps()
        );

        // ── Step 5: Persist ───────────────────────────────────────────────────
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt.save(&dae)?;
        MetricsLogger::new(&cfg.checkpoint_dir)?.log_all(dae.history())?;

        // ── Step 6: Release ───────────────────────────────────────────────────
        let last = dae.history().last().cloned();
        dae.release();
        Ok(last)
    }
}
