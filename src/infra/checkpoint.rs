// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores a trained autoencoder.
//
// What gets saved:
//   1. dae_model.mpk.gz  — tied weights and both bias sets
//   2. dae_config.json   — the full DaeConfig
//
// The config is needed to rebuild a module with the right
// layer widths before the weights can be loaded into it.
// Optimizer state is not saved; a restored model starts with
// fresh Adam moments.
//
// Burn's NamedMpkGzFileRecorder at full precision:
//   - Serialises parameters to MessagePack, gzip-compressed
//   - Stores f32 weights unchanged, so a restored model
//     reconstructs and samples exactly like the saved one
//   - Loading fails if the layer layout doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ml::{autoencoder::DenoisingAutoencoder, config::DaeConfig, layers::TiedAutoencoder};

const MODEL_FILE:  &str = "dae_model";
const CONFIG_FILE: &str = "dae_config.json";

type WeightRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Manages the files of one checkpoint directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write config and weights of a model.
    pub fn save<B: AutodiffBackend>(&self, dae: &DenoisingAutoencoder<B>) -> Result<()> {
        self.save_config(dae.config())?;

        // Path without extension; the recorder adds it
        let path = self.dir.join(MODEL_FILE);
        WeightRecorder::new()
            .record(dae.module().clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))?;

        tracing::info!("Saved checkpoint to '{}'", self.dir.display());
        Ok(())
    }

    /// Rebuild a model from a checkpoint directory.
    pub fn load<B: AutodiffBackend>(&self, device: &B::Device) -> Result<DenoisingAutoencoder<B>> {
        self.load_with_config(self.load_config()?, device)
    }

    /// Load the saved weights under a caller-supplied config.
    ///
    /// Only settings that leave the layer layout alone (sampling mode,
    /// seed, corruption) may differ from the saved config.
    pub fn load_with_config<B: AutodiffBackend>(
        &self,
        config: DaeConfig,
        device: &B::Device,
    ) -> Result<DenoisingAutoencoder<B>> {
        config.validate()?;

        // The freshly initialised values are overwritten by the record
        let template = TiedAutoencoder::<B>::init(
            &config.layer_widths(),
            &config.weight_init,
            &config.bias_init,
            &mut StdRng::seed_from_u64(config.seed),
            device,
        )?;

        let path = self.dir.join(MODEL_FILE);
        let record = WeightRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load weights '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        let module = template.load_record(record);
        tracing::info!(
            "Loaded checkpoint from '{}' (widths {:?})",
            self.dir.display(),
            config.layer_widths()
        );
        Ok(DenoisingAutoencoder::from_module(config, module, device)?)
    }

    pub fn save_config(&self, cfg: &DaeConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<DaeConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' first.",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed model config in '{}'", path.display()))
    }
}
