use flight_price_core::PriceError;
use thiserror::Error;

/// Errors returned by the trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// Required column absent from the dataset header
    #[error("dataset schema error: missing required column `{0}`")]
    MissingColumn(String),

    /// Cell that cannot be read as the column's type
    #[error("dataset schema error: line {line}, column `{column}`: cannot parse `{value}`")]
    UnreadableValue {
        line: u64,
        column: String,
        value: String,
    },

    /// Row whose field count differs from the header
    #[error("dataset schema error: line {line} has {found} fields, header has {expected}")]
    RaggedRow { line: u64, expected: u64, found: u64 },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("dataset read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("training error: {0}")]
    Training(String),

    #[error("evaluation error: {0}")]
    Evaluation(#[from] linfa::Error),

    #[error("artifact error: {0}")]
    Artifact(#[from] PriceError),
}

impl TrainerError {
    /// Whether the error comes from the dataset layout or contents.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            TrainerError::MissingColumn(_)
                | TrainerError::UnreadableValue { .. }
                | TrainerError::RaggedRow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;
