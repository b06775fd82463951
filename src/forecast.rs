//! Forecast expansion: every `(month, product)` pair over the horizon.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, FeatureVector, ProductIndex, Regressor, Result};

/// Default number of months to forecast.
pub const DEFAULT_HORIZON: u32 = 6;

/// Longest accepted horizon (100 years).
pub const MAX_HORIZON: u32 = 1200;

/// One predicted quantity for a product in a forecast month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub product: String,
    pub month: u32,
    pub predicted: f32,
}

/// Query `model` for months `1..=horizon` × every product.
///
/// Output is ordered month-major, then by product insertion order, and has exactly
/// `horizon * products.len()` entries. The first failing prediction aborts the
/// whole forecast. A horizon above [`MAX_HORIZON`] is rejected before any query.
pub fn forecast<R>(model: &R, products: &ProductIndex, horizon: u32) -> Result<Vec<ForecastPoint>>
where
    R: Regressor + ?Sized,
{
    if horizon > MAX_HORIZON {
        return Err(Error::InvalidConfig(format!(
            "horizon {horizon} exceeds the maximum of {MAX_HORIZON} months"
        )));
    }
    let mut points = Vec::with_capacity(horizon as usize * products.len());

    for month in 1..=horizon {
        for (product_index, name) in products.iter() {
            let predicted = model.predict(FeatureVector::new(month, product_index))?;
            points.push(ForecastPoint {
                product: name.to_owned(),
                month,
                predicted,
            });
        }
    }

    debug!(
        horizon,
        products = products.len(),
        points = points.len(),
        "forecast complete"
    );
    Ok(points)
}
