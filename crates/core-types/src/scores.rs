use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

fn check_range(kind: &'static str, value: i64) -> Result<u8, CoreError> {
    if (MIN_SCORE as i64..=MAX_SCORE as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(CoreError::ScoreOutOfRange { kind, value })
    }
}

/// Risk exposure of an order or client on a 1-10 scale.
///
/// Out-of-range values are rejected rather than clamped, so a broken scoring
/// formula surfaces as an error instead of a plausible-looking score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Risk(u8);

impl Risk {
    pub fn new(value: i64) -> Result<Self, CoreError> {
        check_range("RISK", value).map(Self)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Risk {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Risk> for u8 {
    fn from(risk: Risk) -> Self {
        risk.0
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Profitability rank of an order or client on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Gain(u8);

impl Gain {
    pub fn new(value: i64) -> Result<Self, CoreError> {
        check_range("GAIN", value).map(Self)
    }

    /// The top of the scale, used for degenerate single-order groups.
    pub fn max() -> Self {
        Self(MAX_SCORE)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Gain {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Gain> for u8 {
    fn from(gain: Gain) -> Self {
        gain.0
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
