//! Greedy planning of a single capacity-bounded shift.

pub mod error;
pub mod shift;

pub use error::SchedulerError;
pub use shift::{ShiftSelection, ShiftSelector};
