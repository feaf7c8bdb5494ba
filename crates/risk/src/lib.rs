//! Client-relative RISK/GAIN scoring and the bad-order heuristics built on it.

pub mod detector;
pub mod error;
pub mod scorer;

pub use detector::{
    bottleneck_candidates, classify_client, BadOrderDetector, BadOrderFlag, BottleneckCandidate,
    ClientClass, FlagPolicy,
};
pub use error::RiskError;
pub use scorer::{group_by_client, ClientSummary, RiskGainScorer, ScoredOrder};
