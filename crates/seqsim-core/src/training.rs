//! Optimizer wiring around the model.
//!
//! [`Trainer`] owns the variable map and an AdamW optimizer over every
//! trainable tensor, and exposes a single gradient step plus a no-gradient
//! evaluation pass. Anything beyond that (epoch loops, batching, early
//! stopping) is up to the caller.

use candle_core::{DType, Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::Result;
use crate::metrics::accuracy;
use crate::model::CnnSiameseNet;

/// Loss and accuracy for one batch.
#[derive(Debug, Clone, Copy)]
pub struct TrainStats {
    pub loss: f32,
    pub accuracy: f32,
}

pub struct Trainer {
    model: CnnSiameseNet,
    varmap: VarMap,
    optimizer: AdamW,
}

impl Trainer {
    /// Builds the model with fresh variables on `device` and an AdamW
    /// optimizer over all of them.
    pub fn new(cfg: ModelConfig, device: &Device) -> Result<Self> {
        cfg.validate()?;

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = CnnSiameseNet::new(&cfg, vb)?;

        let optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: cfg.learning_rate,
                ..Default::default()
            },
        )?;
        info!(
            learning_rate = cfg.learning_rate,
            num_vars = varmap.all_vars().len(),
            "initialized trainer"
        );

        Ok(Self {
            model,
            varmap,
            optimizer,
        })
    }

    pub fn model(&self) -> &CnnSiameseNet {
        &self.model
    }

    pub fn var_map(&self) -> &VarMap {
        &self.varmap
    }

    /// One forward/backward pass with a weight update.
    ///
    /// `x1`/`x2` are `[B, sequence_len]` token batches, `labels` is
    /// `[B, 1]` f32.
    pub fn step(&mut self, x1: &Tensor, x2: &Tensor, labels: &Tensor) -> Result<TrainStats> {
        let predictions = self.model.forward(x1, x2, true)?;
        let loss = self.model.loss(&predictions, labels)?;
        self.optimizer.backward_step(&loss)?;

        let stats = TrainStats {
            loss: loss.to_scalar::<f32>()?,
            accuracy: accuracy(&predictions, labels)?,
        };
        debug!(loss = stats.loss, accuracy = stats.accuracy, "train step");
        Ok(stats)
    }

    /// Forward pass without dropout or weight updates.
    pub fn evaluate(&self, x1: &Tensor, x2: &Tensor, labels: &Tensor) -> Result<TrainStats> {
        let predictions = self.model.forward(x1, x2, false)?;
        let loss = self.model.loss(&predictions, labels)?;
        Ok(TrainStats {
            loss: loss.to_scalar::<f32>()?,
            accuracy: accuracy(&predictions, labels)?,
        })
    }
}
