//! Similarity heads combining the two branch vectors.

use candle_core::{Tensor, D};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const COSINE_EPS: f64 = 1e-8;

/// Similarity head selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Similarity {
    /// `exp(-||a - b||_1)`, in (0, 1]
    #[default]
    Manhattan,
    /// `exp(-||a - b||_2)`, in (0, 1]
    Euclidean,
    /// Cosine similarity, in [-1, 1]
    Cosine,
}

impl Similarity {
    /// Combines two `[B, H]` branch vectors into a `[B, 1]` score.
    pub fn forward(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        match self {
            Similarity::Manhattan => manhattan_similarity(a, b),
            Similarity::Euclidean => euclidean_distance(a, b)?
                .neg()?
                .exp()
                .map_err(Error::from),
            Similarity::Cosine => cosine_similarity(a, b),
        }
    }
}

/// `exp(-||a - b||_1)` per row.
pub fn manhattan_similarity(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    let dist = (a - b)?.abs()?.sum_keepdim(D::Minus1)?;
    dist.neg()?.exp().map_err(Error::from)
}

/// `||a - b||_2` per row.
pub fn euclidean_distance(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    (a - b)?
        .sqr()?
        .sum_keepdim(D::Minus1)?
        .sqrt()
        .map_err(Error::from)
}

/// Cosine similarity per row.
pub fn cosine_similarity(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    let dot = (a * b)?.sum_keepdim(D::Minus1)?;
    let norm_a = a.sqr()?.sum_keepdim(D::Minus1)?.sqrt()?;
    let norm_b = b.sqr()?.sum_keepdim(D::Minus1)?.sqrt()?;
    let denom = (norm_a * norm_b)?.affine(1.0, COSINE_EPS)?;
    dot.broadcast_div(&denom).map_err(Error::from)
}
