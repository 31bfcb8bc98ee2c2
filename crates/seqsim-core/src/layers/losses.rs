//! Loss functions.

use candle_core::Tensor;

use crate::error::{Error, Result};

/// Mean squared error between labels and predictions, reduced to a scalar.
pub fn mse(labels: &Tensor, predictions: &Tensor) -> Result<Tensor> {
    (labels - predictions)?.sqr()?.mean_all().map_err(Error::from)
}

/// Contrastive loss over a distance head.
///
/// `mean(y * d^2 + (1 - y) * max(margin - d, 0)^2)` with binary labels `y`
/// and per-pair distances `d`, both `[B, 1]`.
pub fn contrastive_loss(labels: &Tensor, distance: &Tensor, margin: f64) -> Result<Tensor> {
    let pos = (labels * &distance.sqr()?)?;
    let hinge = distance.affine(-1.0, margin)?.relu()?.sqr()?;
    let neg = (&labels.affine(-1.0, 1.0)? * &hinge)?;
    (pos + neg)?.mean_all().map_err(Error::from)
}
