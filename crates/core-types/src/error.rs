use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{kind} score must be between 1 and 10, got {value}")]
    ScoreOutOfRange { kind: &'static str, value: i64 },

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
