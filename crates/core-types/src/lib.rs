pub mod error;
pub mod scores;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use scores::{Gain, Risk, MAX_SCORE, MIN_SCORE};
pub use structs::Order;
