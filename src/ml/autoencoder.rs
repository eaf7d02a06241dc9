// ============================================================
// Layer 5 — DenoisingAutoencoder
// ============================================================
// The model instance callers work with. It owns, for its whole
// lifetime:
//
//   • the validated DaeConfig
//   • the tied-weight parameters (TiedAutoencoder)
//   • the Adam optimiser state
//   • the target device
//   • a seeded StdRng used for every random draw
//
// Nothing is global: two instances with the same seed behave
// identically, and instances never share parameters.
//
// Operations are split across files by concern:
//   autoencoder.rs — construct, transform, reconstruct, release
//   trainer.rs     — fit, partial_fit
//   sampler.rs     — sample
//
// Inference runs a single clean pass (no corruption, no
// walkback) on the inner, non-autodiff backend.

use burn::{
    module::AutodiffModule,
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::data::batcher::{to_matrix, MatrixBatcher};
use crate::domain::{corruption::Corruption, matrix::Matrix};
use crate::error::{DaeError, Result};
use crate::ml::config::DaeConfig;
use crate::ml::layers::TiedAutoencoder;
use crate::ml::trainer::EpochSummary;

pub struct DenoisingAutoencoder<B: AutodiffBackend> {
    pub(crate) config:     DaeConfig,
    pub(crate) corruption: Corruption,
    pub(crate) module:     TiedAutoencoder<B>,
    pub(crate) optimizer:  OptimizerAdaptor<Adam, TiedAutoencoder<B>, B>,
    pub(crate) batcher:    MatrixBatcher<B>,
    pub(crate) device:     B::Device,
    pub(crate) rng:        StdRng,
    pub(crate) steps:      usize,
    pub(crate) history:    Vec<EpochSummary>,
}

impl<B: AutodiffBackend> DenoisingAutoencoder<B> {
    /// Build a ready-to-train model with freshly initialised parameters.
    pub fn new(config: DaeConfig, device: &B::Device) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let module = TiedAutoencoder::init(
            &config.layer_widths(),
            &config.weight_init,
            &config.bias_init,
            &mut rng,
            device,
        )?;

        tracing::info!(
            "DAE ready: widths={:?}, corruption={} (p={}), walkbacks={}, params={}",
            config.layer_widths(),
            config.corrupt_type,
            config.corrupt_prob,
            config.walkbacks,
            module.num_params(),
        );

        Ok(Self::assemble(config, module, rng, device))
    }

    /// Wrap already-trained parameters, e.g. restored from a checkpoint.
    ///
    /// The optimiser state starts fresh.
    pub fn from_module(config: DaeConfig, module: TiedAutoencoder<B>, device: &B::Device) -> Result<Self> {
        config.validate()?;
        check_layout(&module, &config.layer_widths())?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, module, rng, device))
    }

    fn assemble(config: DaeConfig, module: TiedAutoencoder<B>, rng: StdRng, device: &B::Device) -> Self {
        Self {
            corruption: config.corruption(),
            optimizer:  AdamConfig::new().with_epsilon(1e-8).init(),
            batcher:    MatrixBatcher::new(device.clone()),
            device:     device.clone(),
            module,
            config,
            rng,
            steps:      0,
            history:    Vec::new(),
        }
    }

    /// Latent codes for each row, shape [rows, latent_width].
    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        self.check_width(data)?;
        if data.is_empty() {
            return Ok(Matrix::zeros(0, self.config.latent_width()));
        }
        let model = self.module.valid();
        let x = self.inference_batcher().batch(data);
        to_matrix(model.encode(x, &self.config.activation))
    }

    /// Reconstructions for each row, shape [rows, n_input].
    pub fn reconstruct(&self, data: &Matrix) -> Result<Matrix> {
        self.check_width(data)?;
        if data.is_empty() {
            return Ok(Matrix::zeros(0, self.config.n_input));
        }
        let model = self.module.valid();
        let x = self.inference_batcher().batch(data);
        let (_, y) = model.forward(x, &self.config.activation);
        to_matrix(y)
    }

    /// Drop the parameters, optimiser state and device handle.
    pub fn release(self) {
        tracing::debug!("Releasing DAE after {} optimizer steps", self.steps);
    }

    pub fn config(&self) -> &DaeConfig {
        &self.config
    }

    pub fn module(&self) -> &TiedAutoencoder<B> {
        &self.module
    }

    /// Optimizer steps taken since construction.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Per-epoch summaries of the most recent `fit`.
    pub fn history(&self) -> &[EpochSummary] {
        &self.history
    }

    pub(crate) fn check_width(&self, data: &Matrix) -> Result<()> {
        // A 0 × 0 matrix carries no width information
        if data.cols() != self.config.n_input && !(data.is_empty() && data.cols() == 0) {
            return Err(DaeError::ShapeMismatch {
                expected: self.config.n_input,
                found:    data.cols(),
            });
        }
        Ok(())
    }

    pub(crate) fn inference_batcher(&self) -> MatrixBatcher<B::InnerBackend> {
        MatrixBatcher::new(self.device.clone())
    }
}

/// Every encoder weight must be `[widths[i], widths[i+1]]` and every
/// decoder bias must match the mirrored width.
fn check_layout<B: Backend>(module: &TiedAutoencoder<B>, widths: &[usize]) -> Result<()> {
    let depth = widths.len() - 1;
    if module.depth() != depth || module.decoder.len() != depth {
        return Err(DaeError::InvalidConfig(format!(
            "module has {} layers but the configuration describes {}",
            module.depth(),
            depth
        )));
    }

    for (i, layer) in module.encoder.iter().enumerate() {
        let expected = [widths[i], widths[i + 1]];
        let found = layer.weight.val().dims();
        if found != expected {
            return Err(DaeError::InvalidConfig(format!(
                "encoder layer {i} weight is {found:?}, configuration needs {expected:?}"
            )));
        }
        if layer.bias.val().dims() != [widths[i + 1]] {
            return Err(DaeError::InvalidConfig(format!(
                "encoder layer {i} bias does not have width {}",
                widths[i + 1]
            )));
        }
    }

    for (i, layer) in module.decoder.iter().enumerate() {
        let expected = widths[depth - 1 - i];
        let found = layer.bias.val().dims()[0];
        if found != expected {
            return Err(DaeError::InvalidConfig(format!(
                "decoder layer {i} bias has width {found}, configuration needs {expected}"
            )));
        }
    }
    Ok(())
}
