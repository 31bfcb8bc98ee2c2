//! Error types for the seqsim core crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tensor error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}
