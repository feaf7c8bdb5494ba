use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Score construction failed: {0}")]
    Score(#[from] core_types::CoreError),

    #[error("Risk signal {value}% for order '{order_id}' is outside 0-100%")]
    SignalOutOfRange { order_id: String, value: f64 },

    #[error("Risk parameters from configuration are invalid: {0}")]
    InvalidParameters(String),

    #[error("A calculation error occurred: {0}")]
    Calculation(String),
}
