//! Pipeline configuration.
//!
//! Every field has a documented default, so an empty JSON object (or no file at
//! all) reproduces the stock pipeline: 50 epochs, 10 hidden units, Adam at
//! `1e-3`, and a 6-month horizon.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::forecast::{DEFAULT_HORIZON, MAX_HORIZON};
use crate::{Error, ModelConfig, Result, TrainConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub model: ModelConfig,
    pub train: TrainConfig,
    /// Number of months to forecast.
    pub horizon: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            train: TrainConfig::default(),
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.train.validate()?;
        if self.horizon == 0 {
            return Err(Error::InvalidConfig("horizon must be > 0".to_owned()));
        }
        if self.horizon > MAX_HORIZON {
            return Err(Error::InvalidConfig(format!(
                "horizon must be <= {MAX_HORIZON}, got {}",
                self.horizon
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
        assert_eq!(cfg.train.epochs, 50);
        assert_eq!(cfg.model.hidden_units, 10);
        assert_eq!(cfg.horizon, 6);
    }

    #[test]
    fn nested_overrides_keep_sibling_defaults() {
        let cfg =
            PipelineConfig::from_json_str(r#"{"train": {"epochs": 5}, "model": {"seed": 1}}"#)
                .unwrap();
        assert_eq!(cfg.train.epochs, 5);
        assert_eq!(cfg.train.learning_rate, 1e-3);
        assert_eq!(cfg.model.seed, Some(1));
        assert_eq!(cfg.model.hidden_units, 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"horizon": 0}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"horizon": 4294967295}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(PipelineConfig::from_json_str(r#"{"horizon": 1200}"#).is_ok());
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"train": {"learning_rate": -1.0}}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PipelineConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
