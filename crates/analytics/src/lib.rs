//! # Order Insight Analytics
//!
//! Stateless calculations over order tables: the per-order economics every
//! other crate builds on, descriptive statistics, and correlation diagnostics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   printing or configuration. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function takes orders (or plain samples)
//!   and returns new values. Nothing is cached between calls.
//!
//! ## Public API
//!
//! - `derive_metrics` / `derive_all`: contribution margin and margin per hour.
//! - `client_correlation`: risk vs. margin-per-hour association for one client.
//! - `margin_drivers`: which order attributes move margin per hour.
//! - `stats`: mean, population variance, quantiles and Pearson's r.

// Declare the modules that constitute this crate.
pub mod correlation;
pub mod drivers;
pub mod error;
pub mod metrics;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use correlation::{client_correlation, CorrelationOutcome, CorrelationResult};
pub use drivers::{margin_drivers, Direction, Feature, MarginDriver, Strength};
pub use error::AnalyticsError;
pub use metrics::{derive_all, derive_metrics, DerivedOrder, OrderMetrics};
