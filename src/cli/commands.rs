// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `train`, `sample` and `reconstruct`
// and all their configurable flags.
//
// clap's derive macros generate help text, missing-argument
// errors and string → value conversion (usize, f64, and the
// FromStr impls of Activation / SampleMode).

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{sample_use_case::InferenceOverrides, train_use_case::TrainConfig};
use crate::ml::config::{Activation, SampleMode};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a denoising autoencoder on a numeric CSV dataset
    Train(TrainArgs),

    /// Generate a pseudo-Gibbs sampling chain from seed rows
    Sample(SampleArgs),

    /// Reconstruct every row of a CSV dataset
    Reconstruct(ReconstructArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with one example per line
    #[arg(long)]
    pub data: PathBuf,

    /// Directory for weights, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Encoder layer widths, outermost first (e.g. 100,50)
    #[arg(long, value_delimiter = ',', required = true)]
    pub hidden_dims: Vec<usize>,

    #[arg(long, default_value_t = 1000)]
    pub epochs: usize,

    /// Rows per mini-batch; a trailing partial batch is skipped
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// salt_and_pepper, masking or gaussian
    /// (anything else falls back to salt_and_pepper)
    #[arg(long, default_value = "salt_and_pepper")]
    pub corrupt_type: String,

    /// Corruption rate, or mixing weight for gaussian noise
    #[arg(long, default_value_t = 0.5)]
    pub corrupt_prob: f64,

    /// Standard deviation of gaussian noise
    #[arg(long, default_value_t = 0.25)]
    pub corrupt_std: f64,

    /// Extra reconstruction steps per batch; 0 disables walkback
    #[arg(long, default_value_t = 0)]
    pub walkbacks: usize,

    /// sigmoid, tanh, relu or lrelu
    #[arg(long, default_value = "sigmoid")]
    pub activation: Activation,

    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// Log the cost every N epochs
    #[arg(long, default_value_t = 1)]
    pub log_every: usize,

    /// Sampler behaviour stored with the model
    #[arg(long, default_value = "reconstruct")]
    pub sample_mode: SampleMode,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Keep the file's row order in every epoch
    #[arg(long)]
    pub no_shuffle: bool,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:      a.data,
            checkpoint_dir: a.checkpoint_dir,
            hidden_dims:    a.hidden_dims,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            corrupt_type:   a.corrupt_type,
            corrupt_prob:   a.corrupt_prob,
            corrupt_std:    a.corrupt_std,
            walkbacks:      a.walkbacks,
            activation:     a.activation,
            lr:             a.lr,
            log_every:      (a.log_every > 0).then_some(a.log_every),
            sample_mode:    a.sample_mode,
            seed:           a.seed,
            shuffle:        !a.no_shuffle,
        }
    }
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// CSV file of seed rows; one is picked at random
    #[arg(long)]
    pub seeds: PathBuf,

    /// Number of rows in the chain
    #[arg(long, default_value_t = 10)]
    pub count: usize,

    #[arg(long, default_value = "samples.csv")]
    pub output: PathBuf,

    /// Override the stored sampler behaviour
    #[arg(long)]
    pub mode: Option<SampleMode>,

    /// Override the stored seed
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SampleArgs {
    pub fn overrides(&self) -> InferenceOverrides {
        InferenceOverrides { sample_mode: self.mode, seed: self.seed }
    }
}

#[derive(Args, Debug)]
pub struct ReconstructArgs {
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// CSV file to reconstruct
    #[arg(long)]
    pub data: PathBuf,

    #[arg(long, default_value = "reconstructions.csv")]
    pub output: PathBuf,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use crate::cli::commands::Commands;
    use crate::ml::config::{Activation, SampleMode};
    use crate::application::train_use_case::TrainConfig;
    use clap::Parser;

    #[test]
    fn test_train_args_convert_to_config() {
        let cli = Cli::try_parse_from([
            "dae", "train",
            "--data", "x.csv",
            "--hidden-dims", "100,50",
            "--activation", "lrelu",
            "--no-shuffle",
            "--log-every", "0",
        ])
        .unwrap();

        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.hidden_dims, vec![100, 50]);
        assert_eq!(cfg.activation, Activation::LeakyRelu { leak: 0.2 });
        assert!(!cfg.shuffle);
        assert_eq!(cfg.log_every, None);
        assert_eq!(cfg.sample_mode, SampleMode::Reconstruct);
    }

    #[test]
    fn test_sample_mode_override_parses() {
        let cli = Cli::try_parse_from(["dae", "sample", "--seeds", "s.csv", "--mode", "corrupt"]).unwrap();
        let Commands::Sample(args) = cli.command else { panic!("expected sample") };
        assert_eq!(args.overrides().sample_mode, Some(SampleMode::Corrupt));
        assert_eq!(args.count, 10);
    }

    #[test]
    fn test_unknown_activation_is_rejected() {
        let parsed = Cli::try_parse_from([
            "dae", "train", "--data", "x.csv", "--hidden-dims", "4", "--activation", "softmax",
        ]);
        assert!(parsed.is_err());
    }
}
