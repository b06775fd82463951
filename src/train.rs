use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::optim::{Adam, AdamConfig};
use crate::{Dataset, Error, Mlp, Result, loss};

/// Default number of full passes over the training set.
pub const DEFAULT_EPOCHS: usize = 50;

/// Training hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub eps: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let adam = AdamConfig::default();
        Self {
            epochs: DEFAULT_EPOCHS,
            learning_rate: adam.learning_rate,
            beta1: adam.beta1,
            beta2: adam.beta2,
            eps: adam.eps,
        }
    }
}

impl TrainConfig {
    pub fn adam(&self) -> AdamConfig {
        AdamConfig {
            learning_rate: self.learning_rate,
            beta1: self.beta1,
            beta2: self.beta2,
            eps: self.eps,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        self.adam().validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    pub epochs: usize,
    /// Mean squared error of the last epoch.
    pub final_loss: f32,
    /// Mean squared error per epoch, measured before that epoch's update.
    pub losses: Vec<f32>,
}

impl Mlp {
    /// Full-batch training with MSE + Adam.
    ///
    /// Every epoch runs forward/backward over all samples, averages the gradients,
    /// and applies a single optimizer step. Buffers are allocated once up front.
    pub fn fit(&mut self, train: &Dataset, cfg: &TrainConfig) -> Result<FitReport> {
        if train.is_empty() {
            return Err(Error::InvalidTrainingData(
                "train dataset must not be empty".to_owned(),
            ));
        }
        if train.input_dim() != self.input_dim() {
            return Err(Error::InvalidTrainingData(format!(
                "train input_dim {} does not match model input_dim {}",
                train.input_dim(),
                self.input_dim()
            )));
        }
        if train.target_dim() != self.output_dim() {
            return Err(Error::InvalidTrainingData(format!(
                "train target_dim {} does not match model output_dim {}",
                train.target_dim(),
                self.output_dim()
            )));
        }
        cfg.validate()?;

        let mut adam = Adam::new(cfg.adam(), self)?;
        let mut scratch = self.scratch();
        let mut sample = self.gradients();
        let mut batch = self.gradients();
        let mut losses = Vec::with_capacity(cfg.epochs);

        let inv_n = 1.0 / train.len() as f32;

        for epoch in 0..cfg.epochs {
            batch.clear();
            let mut sum_loss = 0.0_f32;

            for idx in 0..train.len() {
                let input = train.input(idx);
                let target = train.target(idx);

                self.forward(input, &mut scratch);
                sum_loss += loss::mse_backward(scratch.output(), target, sample.d_output_mut());
                self.backward(input, &scratch, &mut sample);
                batch.accumulate_scaled(&sample, inv_n);
            }

            let epoch_loss = sum_loss * inv_n;
            if !epoch_loss.is_finite() {
                return Err(Error::Diverged(format!(
                    "loss became {epoch_loss} at epoch {epoch}"
                )));
            }
            trace!(epoch, loss = epoch_loss, "epoch finished");
            losses.push(epoch_loss);

            adam.step(self, &mut batch);
        }

        let final_loss = losses.last().copied().unwrap_or_default();
        debug!(
            epochs = cfg.epochs,
            samples = train.len(),
            final_loss,
            "training finished"
        );

        Ok(FitReport {
            epochs: cfg.epochs,
            final_loss,
            losses,
        })
    }

    /// Mean squared error over a dataset.
    pub fn evaluate_mse(&self, data: &Dataset) -> Result<f32> {
        if data.is_empty() {
            return Err(Error::InvalidTrainingData(
                "dataset must not be empty".to_owned(),
            ));
        }
        if data.input_dim() != self.input_dim() || data.target_dim() != self.output_dim() {
            return Err(Error::InvalidTrainingData(format!(
                "dataset shape ({}, {}) does not match model ({}, {})",
                data.input_dim(),
                data.target_dim(),
                self.input_dim(),
                self.output_dim()
            )));
        }

        let mut scratch = self.scratch();
        let mut total = 0.0_f32;
        for idx in 0..data.len() {
            self.forward(data.input(idx), &mut scratch);
            total += loss::mse(scratch.output(), data.target(idx));
        }
        Ok(total / data.len() as f32)
    }
}
