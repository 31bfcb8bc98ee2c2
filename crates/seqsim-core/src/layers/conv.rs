//! Convolution + max-over-time pooling blocks.
//!
//! A block convolves the embedded sequence with kernels of one width,
//! applies ReLU and keeps the maximum activation over time, one value per
//! filter. The stack runs several blocks of different widths in parallel
//! over the same input and concatenates their outputs, so a branch reduces
//! to a single fixed-length feature vector regardless of batch content.

use candle_core::{Module, Tensor, D};
use candle_nn::{conv1d, Conv1d, Conv1dConfig, VarBuilder};

use crate::error::{Error, Result};

/// Single-width convolution followed by ReLU and max-over-time pooling.
///
/// Input is the embedded sequence as `[B, E, T]` (channels first); output
/// is `[B, num_filters]`.
pub struct ConvPoolBlock {
    conv: Conv1d,
    num_filters: usize,
}

impl ConvPoolBlock {
    pub fn new(
        embedding_size: usize,
        num_filters: usize,
        filter_size: usize,
        vb: VarBuilder,
    ) -> Result<Self> {
        let conv = conv1d(
            embedding_size,
            num_filters,
            filter_size,
            Conv1dConfig::default(),
            vb.pp("conv"),
        )?;
        Ok(Self { conv, num_filters })
    }

    pub fn num_filters(&self) -> usize {
        self.num_filters
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        // [B, E, T] -> [B, F, T - k + 1] -> [B, F]
        let x = self.conv.forward(x)?;
        let x = x.relu()?;
        x.max(D::Minus1).map_err(Error::from)
    }
}

/// Parallel multi-width convolution stack with concatenated outputs.
pub struct ConvStack {
    blocks: Vec<ConvPoolBlock>,
}

impl ConvStack {
    /// Builds one [`ConvPoolBlock`] per `(num_filters, filter_size)` pair.
    /// The caller guarantees the two slices have equal, non-zero length.
    pub fn new(
        embedding_size: usize,
        num_filters: &[usize],
        filter_sizes: &[usize],
        vb: VarBuilder,
    ) -> Result<Self> {
        let mut blocks = Vec::with_capacity(num_filters.len());
        for (idx, (&n, &size)) in num_filters.iter().zip(filter_sizes).enumerate() {
            blocks.push(ConvPoolBlock::new(
                embedding_size,
                n,
                size,
                vb.pp(format!("cnn_layer_{idx}")),
            )?);
        }
        Ok(Self { blocks })
    }

    /// Combined feature width across all blocks.
    pub fn output_dim(&self) -> usize {
        self.blocks.iter().map(|b| b.num_filters()).sum()
    }

    /// Maps an embedded batch `[B, T, E]` to pooled features `[B, output_dim]`.
    pub fn forward(&self, embedded: &Tensor) -> Result<Tensor> {
        let x = embedded.transpose(1, 2)?.contiguous()?;
        let mut pooled = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            pooled.push(block.forward(&x)?);
        }
        Tensor::cat(&pooled, D::Minus1).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::{VarBuilder, VarMap};

    fn vb(device: &Device) -> (VarMap, VarBuilder<'static>) {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        (varmap, vb)
    }

    #[test]
    fn test_block_output_shape() {
        let device = Device::Cpu;
        let (_varmap, vb) = vb(&device);
        let block = ConvPoolBlock::new(4, 6, 2, vb).unwrap();

        let x = Tensor::randn(0f32, 1.0, (3, 4, 5), &device).unwrap();
        let out = block.forward(&x).unwrap();
        assert_eq!(out.dims(), &[3, 6]);
    }

    #[test]
    fn test_stack_concatenates_widths() {
        let device = Device::Cpu;
        let (_varmap, vb) = vb(&device);
        let stack = ConvStack::new(4, &[3, 2, 5], &[2, 3, 4], vb).unwrap();
        assert_eq!(stack.output_dim(), 10);

        let embedded = Tensor::randn(0f32, 1.0, (2, 7, 4), &device).unwrap();
        let out = stack.forward(&embedded).unwrap();
        assert_eq!(out.dims(), &[2, 10]);
    }

    #[test]
    fn test_stack_is_deterministic() {
        let device = Device::Cpu;
        let (_varmap, vb) = vb(&device);
        let stack = ConvStack::new(3, &[4], &[2], vb).unwrap();

        let embedded = Tensor::randn(0f32, 1.0, (1, 5, 3), &device).unwrap();
        let a = stack.forward(&embedded).unwrap().to_vec2::<f32>().unwrap();
        let b = stack.forward(&embedded).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(a, b);
    }
}
