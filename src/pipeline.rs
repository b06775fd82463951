//! End-to-end forecasting: encode, build, train, forecast.

use serde::Serialize;
use tracing::{info, warn};

use crate::forecast::forecast;
use crate::model::build_regressor;
use crate::train::FitReport;
use crate::{
    ChartData, Dataset, Error, ForecastPoint, PipelineConfig, ProductIndex, Regressor, Result,
    SalesRecord, encode,
};

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    pub products: ProductIndex,
    pub points: Vec<ForecastPoint>,
    /// `None` when no model was trained.
    pub report: Option<FitReport>,
}

impl Forecast {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn chart(&self, horizon: u32) -> ChartData {
        ChartData::from_points(&self.points, horizon)
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    cfg: PipelineConfig,
}

impl Pipeline {
    pub fn new(cfg: PipelineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Like [`Pipeline::try_run`], but empty input is reported and yields an
    /// empty `Forecast` instead of an error.
    pub fn run(&self, records: &[SalesRecord]) -> Result<Forecast> {
        match self.try_run(records) {
            Err(Error::EmptyInput) => {
                warn!("{}; returning an empty forecast", Error::EmptyInput);
                Ok(Forecast::default())
            }
            other => other,
        }
    }

    /// Train the default regressor on `records` and forecast every product.
    pub fn try_run(&self, records: &[SalesRecord]) -> Result<Forecast> {
        self.run_with(records, |cfg| build_regressor(&cfg.model))
    }

    /// Run the pipeline with a caller-supplied model factory.
    ///
    /// `build` is only invoked once the encoded data is known to be trainable.
    pub fn run_with<R, F>(&self, records: &[SalesRecord], build: F) -> Result<Forecast>
    where
        R: Regressor,
        F: FnOnce(&PipelineConfig) -> Result<R>,
    {
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        let encoded = encode(records);
        if encoded.is_empty() {
            return Err(Error::InvalidTrainingData(format!(
                "none of the {} records has a parseable date",
                records.len()
            )));
        }
        info!(
            records = records.len(),
            samples = encoded.len(),
            products = encoded.products().len(),
            "training data encoded"
        );

        let train = Dataset::from_encoded(&encoded)?;
        let mut model = build(&self.cfg)?;
        let report = model.fit(&train, &self.cfg.train)?;
        info!(
            epochs = report.epochs,
            final_loss = report.final_loss,
            "model trained"
        );

        let products = encoded.into_products();
        let points = forecast(&model, &products, self.cfg.horizon)?;
        info!(points = points.len(), horizon = self.cfg.horizon, "forecast ready");

        Ok(Forecast {
            products,
            points,
            report: Some(report),
        })
    }
}
