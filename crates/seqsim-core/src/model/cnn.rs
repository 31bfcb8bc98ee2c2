//! Convolutional Siamese network.
//!
//! Both inputs go through the same embedding table and the same
//! convolution stack, so the two branches share every trainable weight.
//! Each branch reduces to a fixed-length vector, the vectors are projected
//! through a dense layer with dropout, and the configured similarity head
//! turns the pair into a scalar prediction.

use candle_core::{Module, Tensor};
use candle_nn::{embedding, Dropout, Embedding, VarBuilder};
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::layers::basics::FeedForward;
use crate::layers::conv::ConvStack;
use crate::layers::losses::mse;
use crate::layers::similarity::Similarity;

pub struct CnnSiameseNet {
    embeddings: Embedding,
    conv: ConvStack,
    dropout: Dropout,
    projection: FeedForward,
    similarity: Similarity,
    sequence_len: usize,
}

impl CnnSiameseNet {
    pub fn new(cfg: &ModelConfig, vb: VarBuilder) -> Result<Self> {
        cfg.validate()?;

        let embeddings = embedding(
            cfg.vocabulary_size,
            cfg.embedding_size,
            vb.pp("embeddings").pp("word_embeddings"),
        )?;

        let vb_cnn = vb.pp("siamese_cnn");
        let conv = ConvStack::new(
            cfg.embedding_size,
            &cfg.num_filters,
            &cfg.filter_sizes,
            vb_cnn.clone(),
        )?;
        let projection = FeedForward::new(conv.output_dim(), cfg.hidden_units, vb_cnn.pp("projection"))?;
        let dropout = Dropout::new(cfg.dropout_rate);

        debug!(
            vocabulary_size = cfg.vocabulary_size,
            embedding_size = cfg.embedding_size,
            conv_output_dim = conv.output_dim(),
            hidden_units = cfg.hidden_units,
            "built siamese cnn"
        );

        Ok(Self {
            embeddings,
            conv,
            dropout,
            projection,
            similarity: cfg.similarity,
            sequence_len: cfg.sequence_len,
        })
    }

    /// Runs one branch: embedding lookup, conv stack, dropout, projection.
    ///
    /// Input is a `[B, sequence_len]` batch of token indices; output is
    /// `[B, hidden_units]`. Dropout only fires when `train` is set.
    pub fn encode(&self, x: &Tensor, train: bool) -> Result<Tensor> {
        self.check_input(x)?;
        let embedded = self.embeddings.forward(x)?;
        let features = self.conv.forward(&embedded)?;
        let features = self.dropout.forward(&features, train)?;
        self.projection.forward(&features)
    }

    /// Scalar similarity prediction per pair, `[B, 1]`.
    pub fn forward(&self, x1: &Tensor, x2: &Tensor, train: bool) -> Result<Tensor> {
        if x1.dims() != x2.dims() {
            return Err(Error::ShapeMismatch(format!(
                "branch inputs differ: {:?} vs {:?}",
                x1.dims(),
                x2.dims()
            )));
        }
        let out1 = self.encode(x1, train)?;
        let out2 = self.encode(x2, train)?;
        self.similarity.forward(&out1, &out2)
    }

    /// Mean squared error against `[B, 1]` labels.
    pub fn loss(&self, predictions: &Tensor, labels: &Tensor) -> Result<Tensor> {
        mse(labels, predictions)
    }

    fn check_input(&self, x: &Tensor) -> Result<()> {
        let (_batch, len) = x
            .dims2()
            .map_err(|_| Error::ShapeMismatch(format!("expected [B, T] input, got {:?}", x.dims())))?;
        if len != self.sequence_len {
            return Err(Error::ShapeMismatch(format!(
                "sequence length {} does not match configured {}",
                len, self.sequence_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::{VarBuilder, VarMap};

    fn tiny_config() -> ModelConfig {
        ModelConfig {
            sequence_len: 6,
            vocabulary_size: 32,
            embedding_size: 8,
            num_filters: vec![4, 4],
            filter_sizes: vec![2, 3],
            hidden_units: 8,
            dropout_rate: 0.0,
            ..Default::default()
        }
    }

    fn build(cfg: &ModelConfig) -> CnnSiameseNet {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        CnnSiameseNet::new(cfg, vb).unwrap()
    }

    #[test]
    fn test_prediction_is_scalar_per_pair() {
        let model = build(&tiny_config());
        let x1 = Tensor::new(&[[1u32, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12]], &Device::Cpu).unwrap();
        let x2 = Tensor::new(&[[6u32, 5, 4, 3, 2, 1], [1, 1, 2, 2, 3, 3]], &Device::Cpu).unwrap();

        let predictions = model.forward(&x1, &x2, false).unwrap();
        assert_eq!(predictions.dims(), &[2, 1]);

        // Manhattan head stays in (0, 1]
        for row in predictions.to_vec2::<f32>().unwrap() {
            assert!(row[0] > 0.0 && row[0] <= 1.0);
        }
    }

    #[test]
    fn test_shared_weights_give_identical_branches() {
        let model = build(&tiny_config());
        let x = Tensor::new(&[[3u32, 1, 4, 1, 5, 9]], &Device::Cpu).unwrap();

        let a = model.encode(&x, false).unwrap().to_vec2::<f32>().unwrap();
        let b = model.encode(&x, false).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(a, b);

        let prediction = model.forward(&x, &x, false).unwrap();
        let v = prediction.to_vec2::<f32>().unwrap()[0][0];
        assert!((v - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dropout_is_inert_in_eval_mode() {
        // Wide feature/hidden dims so two independent dropout masks
        // cannot plausibly collide or zero out the whole projection.
        let cfg = ModelConfig {
            num_filters: vec![16, 16],
            hidden_units: 16,
            dropout_rate: 0.5,
            ..tiny_config()
        };
        let model = build(&cfg);
        let x = Tensor::new(&[[3u32, 1, 4, 1, 5, 9]], &Device::Cpu).unwrap();

        let a = model.encode(&x, false).unwrap().to_vec2::<f32>().unwrap();
        let b = model.encode(&x, false).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(a, b);

        let t1 = model.encode(&x, true).unwrap().to_vec2::<f32>().unwrap();
        let t2 = model.encode(&x, true).unwrap().to_vec2::<f32>().unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_rejects_wrong_sequence_length() {
        let model = build(&tiny_config());
        let short = Tensor::new(&[[1u32, 2, 3]], &Device::Cpu).unwrap();
        assert!(matches!(
            model.encode(&short, false),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_mismatched_branch_shapes() {
        let model = build(&tiny_config());
        let x1 = Tensor::new(&[[1u32, 2, 3, 4, 5, 6]], &Device::Cpu).unwrap();
        let x2 = Tensor::new(&[[1u32, 2, 3, 4, 5, 6], [1, 2, 3, 4, 5, 6]], &Device::Cpu).unwrap();
        assert!(matches!(
            model.forward(&x1, &x2, false),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_loss_is_scalar() {
        let model = build(&tiny_config());
        let x1 = Tensor::new(&[[1u32, 2, 3, 4, 5, 6]], &Device::Cpu).unwrap();
        let x2 = Tensor::new(&[[2u32, 3, 4, 5, 6, 7]], &Device::Cpu).unwrap();
        let labels = Tensor::new(&[[1.0f32]], &Device::Cpu).unwrap();

        let predictions = model.forward(&x1, &x2, false).unwrap();
        let loss = model.loss(&predictions, &labels).unwrap();
        assert_eq!(loss.dims(), &[] as &[usize]);
        assert!(loss.to_scalar::<f32>().unwrap().is_finite());
    }

    #[test]
    fn test_invalid_config_is_rejected_at_build() {
        let cfg = ModelConfig {
            num_filters: vec![],
            filter_sizes: vec![],
            ..tiny_config()
        };
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        assert!(matches!(
            CnnSiameseNet::new(&cfg, vb),
            Err(Error::ConfigError(_))
        ));
    }
}
