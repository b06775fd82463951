use std::cell::Cell;

use sales_forecast::{
    ChartData, Dataset, Error, FeatureVector, FitReport, Pipeline, PipelineConfig, Regressor,
    Result, SalesRecord, TrainConfig, encode,
};

/// Counts calls and predicts `month + product_index`.
#[derive(Default)]
struct Probe {
    fits: Cell<usize>,
    predictions: Cell<usize>,
}

impl Regressor for &Probe {
    fn fit(&mut self, _train: &Dataset, cfg: &TrainConfig) -> Result<FitReport> {
        self.fits.set(self.fits.get() + 1);
        Ok(FitReport {
            epochs: cfg.epochs,
            final_loss: 0.0,
            losses: Vec::new(),
        })
    }

    fn predict(&self, features: FeatureVector) -> Result<f32> {
        self.predictions.set(self.predictions.get() + 1);
        Ok(features.month as f32 + features.product_index as f32)
    }
}

fn seeded_pipeline() -> Pipeline {
    let mut cfg = PipelineConfig::default();
    cfg.model.seed = Some(2024);
    Pipeline::new(cfg).unwrap()
}

fn shop_records() -> Vec<SalesRecord> {
    vec![
        SalesRecord::new("2024-01-15", "Espresso", "30"),
        SalesRecord::new("2024-01-20", "Latte", "12"),
        SalesRecord::new("2024-02-11", "Espresso", "34"),
        SalesRecord::new("2024-02-13", "Mocha", "5"),
        SalesRecord::new("2024-03-02", "Latte", "n/a"),
        SalesRecord::new("yesterday", "Mocha", "9"),
        SalesRecord::new("2024-03-28", "Mocha", "7"),
    ]
}

#[test]
fn encoding_is_idempotent() {
    let records = shop_records();
    assert_eq!(encode(&records), encode(&records));
}

#[test]
fn features_and_targets_stay_aligned() {
    let records = shop_records();
    let encoded = encode(&records);
    assert_eq!(encoded.features().len(), encoded.targets().len());
    // "yesterday" is the only record dropped.
    assert_eq!(encoded.len(), records.len() - 1);
}

#[test]
fn bad_date_drops_the_record() {
    let records = vec![
        SalesRecord::new("2024-01-15", "A", "5"),
        SalesRecord::new("bad-date", "B", "3"),
    ];
    let encoded = encode(&records);

    assert_eq!(encoded.features().len(), 1);
    assert_eq!(encoded.features()[0].to_input(), [1.0, 0.0]);
    assert_eq!(encoded.targets(), &[5.0]);
}

#[test]
fn bad_quantity_becomes_zero_instead_of_dropping() {
    let records = vec![SalesRecord::new("2024-05-01", "A", "not-a-number")];
    let encoded = encode(&records);

    assert_eq!(encoded.len(), 1);
    assert_eq!(encoded.targets(), &[0.0]);
}

#[test]
fn forecast_covers_six_months_for_each_product() {
    let probe = Probe::default();
    let forecast = seeded_pipeline()
        .run_with(&shop_records(), |_| Ok(&probe))
        .unwrap();

    assert_eq!(forecast.products.names(), &["Espresso", "Latte", "Mocha"]);
    assert_eq!(forecast.points.len(), 18);
    assert_eq!(probe.fits.get(), 1);
    assert_eq!(probe.predictions.get(), 18);

    let mut months: Vec<_> = forecast.points.iter().map(|p| p.month).collect();
    months.sort_unstable();
    months.dedup();
    assert_eq!(months, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn grouping_by_product_recovers_ascending_months() {
    let probe = Probe::default();
    let forecast = seeded_pipeline()
        .run_with(&shop_records(), |_| Ok(&probe))
        .unwrap();

    let mut groups: Vec<(String, Vec<u32>)> = Vec::new();
    for point in &forecast.points {
        match groups.iter_mut().find(|(name, _)| *name == point.product) {
            Some((_, months)) => months.push(point.month),
            None => groups.push((point.product.clone(), vec![point.month])),
        }
    }

    assert_eq!(groups.len(), 3);
    for (_, months) in &groups {
        assert_eq!(months, &vec![1, 2, 3, 4, 5, 6]);
    }

    let chart = ChartData::from_points(&forecast.points, 6);
    let labels: Vec<_> = chart.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Espresso", "Latte", "Mocha"]);
    // Probe predicts month + product index.
    assert_eq!(chart.series[2].values[0], Some(3.0));
}

#[test]
fn empty_input_short_circuits() {
    let probe = Probe::default();
    let pipeline = seeded_pipeline();

    let err = pipeline.run_with(&[], |_| Ok(&probe)).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));

    let forecast = pipeline.run(&[]).unwrap();
    assert!(forecast.products.is_empty());
    assert!(forecast.is_empty());
    assert_eq!(probe.fits.get(), 0);
    assert_eq!(probe.predictions.get(), 0);
}

#[test]
fn no_valid_rows_is_reported_before_training() {
    let probe = Probe::default();
    let records = vec![
        SalesRecord::new("soon", "A", "1"),
        SalesRecord::new("", "B", "2"),
    ];
    let err = seeded_pipeline()
        .run_with(&records, |_| Ok(&probe))
        .unwrap_err();

    assert!(matches!(err, Error::InvalidTrainingData(_)));
    assert_eq!(probe.fits.get(), 0);
}

#[test]
fn default_network_produces_finite_forecasts() {
    let forecast = seeded_pipeline().run(&shop_records()).unwrap();

    assert_eq!(forecast.points.len(), 18);
    assert!(forecast.points.iter().all(|p| p.predicted.is_finite()));
    let report = forecast.report.unwrap();
    assert_eq!(report.losses.len(), 50);
}

#[test]
fn seeded_runs_are_reproducible() {
    let a = seeded_pipeline().run(&shop_records()).unwrap();
    let b = seeded_pipeline().run(&shop_records()).unwrap();
    assert_eq!(a.points, b.points);
}

#[test]
fn overflowing_quantity_fails_without_a_forecast() {
    let records = vec![
        SalesRecord::new("2024-01-15", "A", "1e20"),
        SalesRecord::new("2024-02-15", "A", "5"),
    ];
    let pipeline = seeded_pipeline();

    assert!(matches!(pipeline.run(&records), Err(Error::Diverged(_))));
    assert!(matches!(pipeline.try_run(&records), Err(Error::Diverged(_))));
}
