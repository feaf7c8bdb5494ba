use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Zero variance in '{0}', the statistic is undefined")]
    ZeroVariance(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
