// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application).
//
// Commands:
//   1. `train`       — fit a model on a CSV dataset
//   2. `sample`      — run the sampler from a checkpoint
//   3. `reconstruct` — denoise / reconstruct a CSV dataset
//
// Reference: Rust Book §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ReconstructArgs, SampleArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "dae",
    version,
    about = "Train a denoising autoencoder on numeric CSV data, then sample or reconstruct."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. Only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)       => run_train(args),
            Commands::Sample(args)      => run_sample(args),
            Commands::Reconstruct(args) => run_reconstruct(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.data.display());
    let checkpoint_dir = args.checkpoint_dir.clone();

    match TrainUseCase::new(args.into()).execute()? {
        Some(last) => println!(
            "Training complete after epoch {} (cost {:.4}). Checkpoint saved to '{}'.",
            last.epoch + 1,
            last.avg_cost,
            checkpoint_dir.display()
        ),
        None => println!(
            "No full batch fit in the data; untrained model saved to '{}'.",
            checkpoint_dir.display()
        ),
    }
    Ok(())
}

fn run_sample(args: SampleArgs) -> Result<()> {
    use crate::application::sample_use_case::SampleUseCase;

    let mut use_case = SampleUseCase::new(&args.checkpoint_dir, args.overrides())?;
    let samples = use_case.sample(&args.seeds, args.count, &args.output)?;
    use_case.finish();

    println!("Wrote {} samples to '{}'.", samples.rows(), args.output.display());
    Ok(())
}

fn run_reconstruct(args: ReconstructArgs) -> Result<()> {
    use crate::application::sample_use_case::{InferenceOverrides, SampleUseCase};

    let use_case = SampleUseCase::new(&args.checkpoint_dir, InferenceOverrides::default())?;
    let recon = use_case.reconstruct(&args.data, &args.output)?;
    use_case.finish();

    println!("Wrote {} reconstructions to '{}'.", recon.rows(), args.output.display());
    Ok(())
}
