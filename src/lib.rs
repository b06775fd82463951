//! Monthly sales forecasting with a small dense regressor.
//!
//! `sales-forecast` turns raw sales rows into `(month, product)` features, fits a
//! `2 -> 10 (ReLU) -> 1` network with Adam on mean squared error, and predicts
//! the next months of sales for every product it has seen.
//!
//! # Pipeline
//!
//! 1. [`encode()`]: dates become months, product names become indices, quantities
//!    become `f32` targets. Bad dates drop the row; bad quantities become `0.0`.
//! 2. [`build_regressor`]: fixed topology, seeded or entropy-initialized.
//! 3. [`Mlp::fit`]: full-batch training for a fixed number of epochs.
//! 4. [`forecast()`]: months `1..=horizon` × products, month-major.
//!
//! [`Pipeline`] sequences all four and applies the error policy: empty input is
//! [`Error::EmptyInput`], input with no usable rows is
//! [`Error::InvalidTrainingData`], and nothing is trained in either case.
//!
//! # Quick start
//!
//! ```rust
//! use sales_forecast::{Pipeline, PipelineConfig, SalesRecord};
//!
//! # fn main() -> sales_forecast::Result<()> {
//! let records = vec![
//!     SalesRecord::new("2024-01-15", "Coffee", "12"),
//!     SalesRecord::new("2024-02-15", "Coffee", "15"),
//!     SalesRecord::new("2024-02-20", "Tea", "4"),
//! ];
//!
//! let mut cfg = PipelineConfig::default();
//! cfg.model.seed = Some(0);
//! let forecast = Pipeline::new(cfg)?.run(&records)?;
//!
//! assert_eq!(forecast.points.len(), 6 * 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Driving the network directly
//!
//! The hot path reuses buffers instead of allocating:
//!
//! ```rust
//! use sales_forecast::{Activation, MlpBuilder, loss};
//!
//! # fn main() -> sales_forecast::Result<()> {
//! let mlp = MlpBuilder::new(2)?
//!     .add_layer(10, Activation::ReLU)?
//!     .add_layer(1, Activation::Identity)?
//!     .build_with_seed(0)?;
//!
//! let mut scratch = mlp.scratch();
//! let mut grads = mlp.gradients();
//! let x = [3.0_f32, 1.0];
//!
//! let y = mlp.forward(&x, &mut scratch);
//! let _loss = loss::mse_backward(y, &[20.0], grads.d_output_mut());
//! mlp.backward(&x, &scratch, &mut grads);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod builder;
pub mod config;
pub mod data;
pub mod encode;
pub mod error;
pub mod forecast;
pub mod layer;
pub mod loss;
pub mod mlp;
pub mod model;
pub mod optim;
pub mod pipeline;
pub mod series;
pub mod train;

pub use activation::Activation;
pub use builder::MlpBuilder;
pub use config::PipelineConfig;
pub use data::Dataset;
pub use encode::{
    EncodedSales, FeatureVector, ProductIndex, SalesRecord, coerce_quantity, encode, parse_month,
};
pub use error::{Error, Result};
pub use forecast::{ForecastPoint, MAX_HORIZON, forecast};
pub use layer::{Init, Layer};
pub use mlp::{Gradients, Mlp, Scratch};
pub use model::{ModelConfig, Regressor, build_regressor};
pub use optim::{Adam, AdamConfig};
pub use pipeline::{Forecast, Pipeline};
pub use series::{ChartData, Series};
pub use train::{FitReport, TrainConfig};
