//! Seqsim Core - Siamese CNN similarity network
//!
//! This crate defines a convolutional Siamese network for sequence
//! similarity: two token sequences pass through a shared embedding table
//! and a shared multi-width convolution/max-pooling stack, each branch is
//! projected through a dense layer with dropout, and the two branch
//! vectors are combined by a similarity head into a scalar prediction
//! trained against labeled similarity scores with mean squared error.
//!
//! # Example
//!
//! ```ignore
//! use candle_core::Device;
//! use seqsim_core::{ModelConfig, Trainer};
//!
//! let config = ModelConfig::default();
//! let mut trainer = Trainer::new(config, &Device::Cpu)?;
//!
//! let stats = trainer.step(&x1, &x2, &labels)?;
//! println!("loss={} accuracy={}", stats.loss, stats.accuracy);
//! ```

pub mod config;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod model;
pub mod training;

pub use config::ModelConfig;
pub use error::{Error, Result};
pub use layers::similarity::Similarity;
pub use metrics::accuracy;
pub use model::CnnSiameseNet;
pub use training::{TrainStats, Trainer};
