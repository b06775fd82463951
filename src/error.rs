use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No sales records were supplied.
    #[error("empty input: no sales records supplied")]
    EmptyInput,
    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A buffer does not match the model's input or output width.
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    /// Loss or prediction became NaN/inf.
    #[error("diverged: {0}")]
    Diverged(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
