// ============================================================
// Layer 5 — Autoencoder Configuration
// ============================================================
// DaeConfig holds every hyperparameter of a model instance.
// Burn's #[derive(Config)] generates:
//   - DaeConfig::new(n_input, hidden_dims) for required fields
//   - with_*() builders for every defaulted field
//   - Serialize / Deserialize so checkpoints can store it as JSON
//
// The small enums below are the pluggable pieces of the network:
// activation, weight initialiser, bias initialiser and the
// sampler's between-step behaviour.

use std::str::FromStr;

use burn::{prelude::*, tensor::activation};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::domain::corruption::{Corruption, CorruptionType};
use crate::error::DaeError;

// Config derives Clone and the serde impls itself; deriving them
// again here would conflict.
#[derive(Config, Debug)]
pub struct DaeConfig {
    /// Width of every input row (and of every reconstruction)
    pub n_input: usize,

    /// Encoder widths, outermost first; the decoder mirrors them
    pub hidden_dims: Vec<usize>,

    #[config(default = 1000)]
    pub num_epochs: usize,

    #[config(default = 100)]
    pub batch_size: usize,

    #[config(default = "CorruptionType::SaltAndPepper")]
    pub corrupt_type: CorruptionType,

    /// Corruption rate, or mixing weight for Gaussian noise
    #[config(default = 0.5)]
    pub corrupt_prob: f64,

    /// Standard deviation of Gaussian noise
    #[config(default = 0.25)]
    pub corrupt_std: f64,

    /// Walkback steps per training pass; 0 disables walkback
    #[config(default = 0)]
    pub walkbacks: usize,

    #[config(default = "Activation::Sigmoid")]
    pub activation: Activation,

    #[config(default = "WeightInit::XavierUniform { constant: 1.0 }")]
    pub weight_init: WeightInit,

    #[config(default = "BiasInit::Zeros")]
    pub bias_init: BiasInit,

    #[config(default = 0.001)]
    pub learning_rate: f64,

    /// Log the epoch cost every this many epochs
    pub log_interval: Option<usize>,

    #[config(default = "SampleMode::Reconstruct")]
    pub sample_mode: SampleMode,

    /// Seed for the instance-owned random number generator
    #[config(default = 0)]
    pub seed: u64,
}

impl DaeConfig {
    /// Reject configurations the network cannot be built or trained with.
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |msg: String| Err(DaeError::InvalidConfig(msg));

        if self.n_input == 0 {
            return invalid("n_input must be positive".into());
        }
        if self.hidden_dims.is_empty() {
            return invalid("at least one hidden layer width is required".into());
        }
        if self.hidden_dims.contains(&0) {
            return invalid(format!("hidden layer widths must be positive: {:?}", self.hidden_dims));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.corrupt_prob) {
            return invalid(format!("corrupt_prob must lie in [0, 1], got {}", self.corrupt_prob));
        }
        if !(self.corrupt_std >= 0.0 && self.corrupt_std.is_finite()) {
            return invalid(format!("corrupt_std must be finite and >= 0, got {}", self.corrupt_std));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return invalid(format!("learning_rate must be positive, got {}", self.learning_rate));
        }
        Ok(())
    }

    /// All layer widths, input first: `[n_input, h1, ..., hL]`.
    pub fn layer_widths(&self) -> Vec<usize> {
        std::iter::once(self.n_input)
            .chain(self.hidden_dims.iter().copied())
            .collect()
    }

    /// Width of the innermost (latent) layer.
    pub fn latent_width(&self) -> usize {
        self.hidden_dims.last().copied().unwrap_or(self.n_input)
    }

    /// The resolved noise model for this configuration.
    pub fn corruption(&self) -> Corruption {
        Corruption::resolve(&self.corrupt_type, self.corrupt_prob, self.corrupt_std)
    }
}

// ─── Activation ───────────────────────────────────────────────────────────────
/// Pointwise nonlinearity applied after every encoder and decoder layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    /// `0.5(1+leak)·x + 0.5(1-leak)·|x|`
    LeakyRelu { leak: f64 },
}

impl Activation {
    pub fn apply<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        match *self {
            Self::Sigmoid => activation::sigmoid(x),
            Self::Tanh    => activation::tanh(x),
            Self::Relu    => activation::relu(x),
            Self::LeakyRelu { leak } => {
                let f1 = 0.5 * (1.0 + leak);
                let f2 = 0.5 * (1.0 - leak);
                x.clone().mul_scalar(f1) + x.abs().mul_scalar(f2)
            }
        }
    }
}

impl FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sigmoid"             => Ok(Self::Sigmoid),
            "tanh"                => Ok(Self::Tanh),
            "relu"                => Ok(Self::Relu),
            "lrelu" | "leaky_relu" => Ok(Self::LeakyRelu { leak: 0.2 }),
            other => Err(format!(
                "unknown activation '{other}' (expected sigmoid, tanh, relu or lrelu)"
            )),
        }
    }
}

// ─── Weight initialisation ────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// `U(-c·√(6/(fan_in+fan_out)), +c·√(6/(fan_in+fan_out)))`
    XavierUniform { constant: f64 },
    /// `N(0, std)`
    Normal { std: f64 },
}

impl WeightInit {
    /// Draw `fan_in * fan_out` initial weights, row-major `[fan_in, fan_out]`.
    pub fn sample<R: Rng>(&self, fan_in: usize, fan_out: usize, rng: &mut R) -> crate::error::Result<Vec<f32>> {
        let n = fan_in * fan_out;
        match *self {
            Self::XavierUniform { constant } => {
                let limit = constant * (6.0 / (fan_in + fan_out) as f64).sqrt();
                Ok((0..n)
                    .map(|_| (rng.gen::<f64>() * 2.0 * limit - limit) as f32)
                    .collect())
            }
            Self::Normal { std } => {
                let normal = Normal::new(0.0, std)
                    .map_err(|e| DaeError::InvalidConfig(format!("weight init std {std}: {e}")))?;
                Ok((0..n).map(|_| normal.sample(rng) as f32).collect())
            }
        }
    }
}

// ─── Bias initialisation ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasInit {
    Zeros,
    Constant { value: f64 },
}

impl BiasInit {
    pub fn values(&self, n: usize) -> Vec<f32> {
        match *self {
            Self::Zeros             => vec![0.0; n],
            Self::Constant { value } => vec![value as f32; n],
        }
    }
}

// ─── Sampler behaviour ────────────────────────────────────────────────────────
/// What happens to the previous output before the next sampler step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMode {
    /// Feed the reconstruction back unchanged (deterministic chain)
    Reconstruct,
    /// Draw a binary sample from the reconstruction first
    Bernoulli,
    /// Apply the configured corruption before every reconstruction
    Corrupt,
}

impl FromStr for SampleMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "reconstruct" => Ok(Self::Reconstruct),
            "bernoulli"   => Ok(Self::Bernoulli),
            "corrupt"     => Ok(Self::Corrupt),
            other => Err(format!(
                "unknown sample mode '{other}' (expected reconstruct, bernoulli or corrupt)"
            )),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_defaults() {
        let cfg = DaeConfig::new(784, vec![512, 256, 64]);
        assert_eq!(cfg.num_epochs, 1000);
        assert_eq!(cfg.batch_size, 100);
        assert_eq!(cfg.corrupt_type, CorruptionType::SaltAndPepper);
        assert_eq!(cfg.corrupt_prob, 0.5);
        assert_eq!(cfg.corrupt_std, 0.25);
        assert_eq!(cfg.walkbacks, 0);
        assert_eq!(cfg.activation, Activation::Sigmoid);
        assert_eq!(cfg.learning_rate, 0.001);
        assert_eq!(cfg.log_interval, None);
        assert_eq!(cfg.sample_mode, SampleMode::Reconstruct);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_layer_widths_prepend_input() {
        let cfg = DaeConfig::new(4, vec![3, 2]);
        assert_eq!(cfg.layer_widths(), vec![4, 3, 2]);
        assert_eq!(cfg.latent_width(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(DaeConfig::new(0, vec![2]).validate().is_err());
        assert!(DaeConfig::new(4, vec![]).validate().is_err());
        assert!(DaeConfig::new(4, vec![2, 0]).validate().is_err());
        assert!(DaeConfig::new(4, vec![2]).with_batch_size(0).validate().is_err());
        assert!(DaeConfig::new(4, vec![2]).with_corrupt_prob(1.5).validate().is_err());
        assert!(DaeConfig::new(4, vec![2]).with_corrupt_std(-0.1).validate().is_err());
        assert!(DaeConfig::new(4, vec![2]).with_learning_rate(0.0).validate().is_err());
    }

    #[test]
    fn test_xavier_weights_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = WeightInit::XavierUniform { constant: 1.0 }
            .sample(10, 5, &mut rng)
            .unwrap();
        let limit = (6.0f64 / 15.0).sqrt() as f32;
        assert_eq!(w.len(), 50);
        assert!(w.iter().all(|v| v.abs() <= limit));
    }

    #[test]
    fn test_leaky_relu_matches_formula() {
        use burn::backend::NdArray;
        let x = Tensor::<NdArray, 1>::from_floats([-1.0, 2.0], &Default::default());
        let y = Activation::LeakyRelu { leak: 0.2 }
            .apply(x)
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        approx::assert_abs_diff_eq!(y[0], -0.2, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(y[1], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("lrelu".parse::<Activation>().unwrap(), Activation::LeakyRelu { leak: 0.2 });
        assert!("softmax".parse::<Activation>().is_err());
        assert_eq!("bernoulli".parse::<SampleMode>().unwrap(), SampleMode::Bernoulli);
    }
}
