//! The sales regressor: a fixed `2 -> hidden (ReLU) -> 1 (linear)` network.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::train::{FitReport, TrainConfig};
use crate::{Activation, Dataset, Error, FeatureVector, Mlp, MlpBuilder, Result};

/// Default width of the hidden layer.
pub const DEFAULT_HIDDEN_UNITS: usize = 10;

/// Shape and initialization of the regressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub hidden_units: usize,
    /// Seed for weight initialization; OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hidden_units: DEFAULT_HIDDEN_UNITS,
            seed: None,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hidden_units == 0 {
            return Err(Error::InvalidConfig("hidden_units must be > 0".to_owned()));
        }
        Ok(())
    }
}

/// Something that can be fitted to encoded sales and queried per feature vector.
pub trait Regressor {
    /// Fit to `train`, blocking until every epoch has run.
    fn fit(&mut self, train: &Dataset, cfg: &TrainConfig) -> Result<FitReport>;

    /// Predicted quantity for one `(month, product)` pair.
    fn predict(&self, features: FeatureVector) -> Result<f32>;
}

impl Regressor for Mlp {
    fn fit(&mut self, train: &Dataset, cfg: &TrainConfig) -> Result<FitReport> {
        Mlp::fit(self, train, cfg)
    }

    fn predict(&self, features: FeatureVector) -> Result<f32> {
        // Buffers live only for this call.
        let mut scratch = self.scratch();
        let mut out = [0.0_f32; 1];
        self.predict_one_into(&features.to_input(), &mut scratch, &mut out)?;

        let y = out[0];
        if !y.is_finite() {
            return Err(Error::Diverged(format!(
                "non-finite prediction for month {} product {}",
                features.month, features.product_index
            )));
        }
        Ok(y)
    }
}

/// Build an untrained regressor.
pub fn build_regressor(cfg: &ModelConfig) -> Result<Mlp> {
    cfg.validate()?;

    let builder = MlpBuilder::new(FeatureVector::DIM)?
        .add_layer(cfg.hidden_units, Activation::ReLU)?
        .add_layer(1, Activation::Identity)?;

    debug!(hidden_units = cfg.hidden_units, seed = ?cfg.seed, "building regressor");
    match cfg.seed {
        Some(seed) => builder.build_with_seed(seed),
        None => builder.build_with_rng(&mut StdRng::from_entropy()),
    }
}
