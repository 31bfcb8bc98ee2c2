//! Prediction bookkeeping.

use candle_core::{DType, Tensor};

use crate::error::{Error, Result};

/// Fraction of predictions that round to their label.
///
/// Both tensors are `[B, 1]`; predictions are rounded to the nearest
/// integer before comparison, so a 0.5-threshold binary setup falls out of
/// labels in {0, 1}. Ties round away from zero (`round` semantics), so a
/// prediction of exactly 0.5 counts as a 1.
pub fn accuracy(predictions: &Tensor, labels: &Tensor) -> Result<f32> {
    if predictions.dims() != labels.dims() {
        return Err(Error::ShapeMismatch(format!(
            "predictions {:?} vs labels {:?}",
            predictions.dims(),
            labels.dims()
        )));
    }
    let rounded = predictions.round()?;
    let labels = labels.to_dtype(rounded.dtype())?;
    let correct = rounded.eq(&labels)?.to_dtype(DType::F32)?;
    correct
        .mean_all()?
        .to_scalar::<f32>()
        .map_err(Error::from)
}
