//! Model configuration types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layers::similarity::Similarity;

/// Configuration for the Siamese CNN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Fixed length of each input token sequence
    #[serde(default = "default_sequence_len")]
    pub sequence_len: usize,

    /// Number of rows in the embedding table
    #[serde(default = "default_vocabulary_size")]
    pub vocabulary_size: usize,

    /// Width of each embedding vector
    #[serde(default = "default_embedding_size")]
    pub embedding_size: usize,

    /// Filters per convolution width, one entry per parallel branch
    #[serde(default = "default_num_filters")]
    pub num_filters: Vec<usize>,

    /// Kernel width for each parallel convolution branch
    #[serde(default = "default_filter_sizes")]
    pub filter_sizes: Vec<usize>,

    /// Width of the dense projection applied to each branch
    #[serde(default = "default_hidden_units")]
    pub hidden_units: usize,

    /// Dropout probability applied before the projection (training only)
    #[serde(default = "default_dropout_rate")]
    pub dropout_rate: f32,

    /// Similarity head combining the two branch vectors
    #[serde(default)]
    pub similarity: Similarity,

    /// Optimizer learning rate
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

fn default_sequence_len() -> usize {
    50
}
fn default_vocabulary_size() -> usize {
    20_000
}
fn default_embedding_size() -> usize {
    64
}
fn default_num_filters() -> Vec<usize> {
    vec![50, 50, 50]
}
fn default_filter_sizes() -> Vec<usize> {
    vec![2, 3, 4]
}
fn default_hidden_units() -> usize {
    128
}
fn default_dropout_rate() -> f32 {
    0.5
}
fn default_learning_rate() -> f64 {
    0.001
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sequence_len: default_sequence_len(),
            vocabulary_size: default_vocabulary_size(),
            embedding_size: default_embedding_size(),
            num_filters: default_num_filters(),
            filter_sizes: default_filter_sizes(),
            hidden_units: default_hidden_units(),
            dropout_rate: default_dropout_rate(),
            similarity: Similarity::default(),
            learning_rate: default_learning_rate(),
        }
    }
}

impl ModelConfig {
    /// Total width of the concatenated conv-stack output per branch.
    pub fn conv_output_dim(&self) -> usize {
        self.num_filters.iter().sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.sequence_len == 0 {
            return Err(Error::ConfigError("sequence_len must be > 0".into()));
        }
        if self.vocabulary_size == 0 {
            return Err(Error::ConfigError("vocabulary_size must be > 0".into()));
        }
        if self.embedding_size == 0 {
            return Err(Error::ConfigError("embedding_size must be > 0".into()));
        }
        if self.hidden_units == 0 {
            return Err(Error::ConfigError("hidden_units must be > 0".into()));
        }
        if self.num_filters.is_empty() || self.filter_sizes.is_empty() {
            return Err(Error::ConfigError(
                "num_filters and filter_sizes must be non-empty".into(),
            ));
        }
        if self.num_filters.len() != self.filter_sizes.len() {
            return Err(Error::ConfigError(format!(
                "num_filters has {} entries but filter_sizes has {}",
                self.num_filters.len(),
                self.filter_sizes.len()
            )));
        }
        if self.num_filters.iter().any(|&n| n == 0) {
            return Err(Error::ConfigError("each num_filters entry must be > 0".into()));
        }
        for &size in &self.filter_sizes {
            if size == 0 || size > self.sequence_len {
                return Err(Error::ConfigError(format!(
                    "filter size {} must be in 1..={}",
                    size, self.sequence_len
                )));
            }
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(Error::ConfigError(
                "dropout_rate must be in [0, 1)".into(),
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(Error::ConfigError("learning_rate must be > 0".into()));
        }
        Ok(())
    }
}
