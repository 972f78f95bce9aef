use thiserror::Error;

/// Rejections produced by the evaluator and the settings validators.
///
/// Every variant carries a human-readable reason so the caller can show a
/// precise message next to the field that was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Invalid VAT: {0}")]
    InvalidVat(String),

    #[error("Invalid tier schedule: {0}")]
    InvalidTierSchedule(String),

    #[error("Consumption out of range: {0}")]
    ConsumptionOutOfRange(String),
}

impl EvaluatorError {
    /// The reason without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            EvaluatorError::InvalidConfiguration(reason)
            | EvaluatorError::InvalidThreshold(reason)
            | EvaluatorError::InvalidVat(reason)
            | EvaluatorError::InvalidTierSchedule(reason)
            | EvaluatorError::ConsumptionOutOfRange(reason) => reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, EvaluatorError>;
