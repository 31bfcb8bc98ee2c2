//! Seqsim CLI - train and evaluate the Siamese CNN on synthetic pairs.
//!
//! Examples:
//!   seqsim train                         # train with default config
//!   seqsim train --steps 500 --seed 7    # longer run, fixed seed
//!   seqsim train --config model.json     # load hyperparameters from JSON

use std::path::PathBuf;
use std::process::ExitCode;

use candle_core::{Device, Tensor};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use seqsim_core::{Error, ModelConfig, Result, Trainer};

/// Siamese CNN similarity network
#[derive(Parser)]
#[command(
    name = "seqsim",
    about = "Siamese CNN sequence-similarity network",
    version = env!("CARGO_PKG_VERSION"),
    arg_required_else_help = true,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on synthetic token pairs and report loss/accuracy
    Train {
        /// Model configuration file (JSON, missing fields use defaults)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Number of optimizer steps
        #[arg(long, default_value = "200", env = "SEQSIM_STEPS")]
        steps: usize,

        /// Pairs per batch (half similar, half dissimilar)
        #[arg(long, default_value = "32", env = "SEQSIM_BATCH_SIZE")]
        batch_size: usize,

        /// RNG seed for synthetic data
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Log every N steps
        #[arg(long, default_value = "20")]
        log_interval: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Train {
            config,
            steps,
            batch_size,
            seed,
            log_interval,
        } => run_train(config, steps, batch_size, seed, log_interval),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_train(
    config_path: Option<PathBuf>,
    steps: usize,
    batch_size: usize,
    seed: u64,
    log_interval: usize,
) -> Result<()> {
    let config = load_config(config_path)?;
    validate_train_args(batch_size, log_interval)?;

    let device = Device::Cpu;
    let mut trainer = Trainer::new(config.clone(), &device)?;
    let mut rng = StdRng::seed_from_u64(seed);

    info!(
        steps,
        batch_size,
        sequence_len = config.sequence_len,
        vocabulary_size = config.vocabulary_size,
        similarity = ?config.similarity,
        "training on synthetic pairs"
    );

    for step in 1..=steps {
        let (x1, x2, labels) = synthetic_batch(&config, batch_size, &mut rng, &device)?;
        let stats = trainer.step(&x1, &x2, &labels)?;
        if step % log_interval == 0 || step == steps {
            info!(step, loss = stats.loss, accuracy = stats.accuracy);
        }
    }

    let (x1, x2, labels) = synthetic_batch(&config, batch_size, &mut rng, &device)?;
    let eval = trainer.evaluate(&x1, &x2, &labels)?;
    info!(loss = eval.loss, accuracy = eval.accuracy, "held-out batch");

    Ok(())
}

fn validate_train_args(batch_size: usize, log_interval: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(Error::ConfigError("batch_size must be > 0".into()));
    }
    if log_interval == 0 {
        return Err(Error::ConfigError("log_interval must be > 0".into()));
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<ModelConfig> {
    let Some(path) = path else {
        return Ok(ModelConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))?;
    let config: ModelConfig = serde_json::from_str(&raw)
        .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))?;
    config.validate()?;
    Ok(config)
}

/// Generates a batch of labeled pairs: even rows are near-duplicates
/// (one substituted token, label 1), odd rows are independent draws
/// (label 0).
fn synthetic_batch(
    config: &ModelConfig,
    batch_size: usize,
    rng: &mut StdRng,
    device: &Device,
) -> Result<(Tensor, Tensor, Tensor)> {
    let seq_len = config.sequence_len;
    let vocab = config.vocabulary_size as u32;

    let mut x1 = Vec::with_capacity(batch_size * seq_len);
    let mut x2 = Vec::with_capacity(batch_size * seq_len);
    let mut labels = Vec::with_capacity(batch_size);

    for row in 0..batch_size {
        let a: Vec<u32> = (0..seq_len).map(|_| rng.gen_range(0..vocab)).collect();
        if row % 2 == 0 {
            let mut b = a.clone();
            let pos = rng.gen_range(0..seq_len);
            b[pos] = rng.gen_range(0..vocab);
            x2.extend_from_slice(&b);
            labels.push(1.0f32);
        } else {
            let b: Vec<u32> = (0..seq_len).map(|_| rng.gen_range(0..vocab)).collect();
            x2.extend_from_slice(&b);
            labels.push(0.0f32);
        }
        x1.extend_from_slice(&a);
    }

    let x1 = Tensor::from_vec(x1, (batch_size, seq_len), device)?;
    let x2 = Tensor::from_vec(x2, (batch_size, seq_len), device)?;
    let labels = Tensor::from_vec(labels, (batch_size, 1), device)?;
    Ok((x1, x2, labels))
}
