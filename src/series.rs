//! Chart-ready reshaping of forecast points.
//!
//! Pure data; drawing is left to whatever renders the series.

use serde::Serialize;

use crate::ForecastPoint;

/// One line on the chart: a product's predictions by forecast month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    /// `values[m - 1]` is the prediction for month `m`; months without a point are `None`.
    pub values: Vec<Option<f32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    /// `"Month 1"`..`"Month N"`.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    /// Group `points` by product, keeping first-occurrence order.
    ///
    /// Points whose month falls outside `1..=horizon` are ignored.
    pub fn from_points(points: &[ForecastPoint], horizon: u32) -> Self {
        let labels = (1..=horizon).map(|m| format!("Month {m}")).collect();
        let mut series: Vec<Series> = Vec::new();

        for point in points {
            if point.month == 0 || point.month > horizon {
                continue;
            }

            let idx = match series.iter().position(|s| s.label == point.product) {
                Some(idx) => idx,
                None => {
                    series.push(Series {
                        label: point.product.clone(),
                        values: vec![None; horizon as usize],
                    });
                    series.len() - 1
                }
            };
            series[idx].values[point.month as usize - 1] = Some(point.predicted);
        }

        Self { labels, series }
    }
}
