//! Dense projection applied to each branch after pooling.

use candle_core::{Module, Tensor};
use candle_nn::{linear, Linear, VarBuilder};

use crate::error::{Error, Result};

/// Fully connected layer with ReLU activation.
pub struct FeedForward {
    linear: Linear,
    out_dim: usize,
}

impl FeedForward {
    pub fn new(in_dim: usize, out_dim: usize, vb: VarBuilder) -> Result<Self> {
        let linear = linear(in_dim, out_dim, vb.pp("linear"))?;
        Ok(Self { linear, out_dim })
    }

    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = self.linear.forward(x)?;
        x.relu().map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::{VarBuilder, VarMap};

    #[test]
    fn test_projection_shape_and_relu() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let ff = FeedForward::new(6, 4, vb).unwrap();
        assert_eq!(ff.out_dim(), 4);

        let x = Tensor::randn(0f32, 1.0, (3, 6), &device).unwrap();
        let out = ff.forward(&x).unwrap();
        assert_eq!(out.dims(), &[3, 4]);

        // ReLU output is never negative
        let min = out.flatten_all().unwrap().min(0).unwrap();
        assert!(min.to_scalar::<f32>().unwrap() >= 0.0);
    }
}
