use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Shift capacity must be positive, got {0} hours")]
    InvalidCapacity(Decimal),
}
