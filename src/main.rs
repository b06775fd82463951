use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use sales_forecast::{Pipeline, PipelineConfig, SalesRecord};

/// Train a small regressor on monthly sales and print a forecast as JSON.
#[derive(Debug, Parser)]
#[command(name = "sales-forecast", version)]
struct Cli {
    /// JSON array of `{sales_date, product_description, quantity_sold}` records.
    #[arg(short, long)]
    input: PathBuf,

    /// JSON pipeline config; missing fields use the built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    epochs: Option<usize>,

    #[arg(long)]
    hidden_units: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f32>,

    /// Months to forecast.
    #[arg(long)]
    horizon: Option<u32>,

    /// Seed weight initialization for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Points)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Flat `(product, month, predicted)` records.
    Points,
    /// Month labels plus one series per product.
    Series,
}

impl Cli {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut cfg = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(epochs) = self.epochs {
            cfg.train.epochs = epochs;
        }
        if let Some(hidden_units) = self.hidden_units {
            cfg.model.hidden_units = hidden_units;
        }
        if let Some(learning_rate) = self.learning_rate {
            cfg.train.learning_rate = learning_rate;
        }
        if let Some(horizon) = self.horizon {
            cfg.horizon = horizon;
        }
        if self.seed.is_some() {
            cfg.model.seed = self.seed;
        }
        Ok(cfg)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = cli.pipeline_config()?;
    let pipeline = Pipeline::new(cfg).context("invalid pipeline config")?;

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let records: Vec<SalesRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse records in {}", cli.input.display()))?;

    let forecast = pipeline.run(&records)?;

    let json = match cli.format {
        OutputFormat::Points => serde_json::to_string_pretty(&forecast.points)?,
        OutputFormat::Series => {
            serde_json::to_string_pretty(&forecast.chart(pipeline.config().horizon))?
        }
    };
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
