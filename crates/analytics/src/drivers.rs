use crate::metrics::DerivedOrder;
use crate::stats::{self, to_f64};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Raw order attributes that are tested as drivers of margin per hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ProcessingTimeHr,
    Costs,
    Profit,
    RiskPct,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::ProcessingTimeHr,
        Feature::Costs,
        Feature::Profit,
        Feature::RiskPct,
    ];

    fn extract(self, d: &DerivedOrder) -> f64 {
        match self {
            Feature::ProcessingTimeHr => to_f64(d.order.processing_time_hr),
            Feature::Costs => to_f64(d.order.costs),
            Feature::Profit => to_f64(d.order.profit),
            Feature::RiskPct => to_f64(d.order.risk_pct),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::ProcessingTimeHr => "processing_time_hr",
            Feature::Costs => "costs",
            Feature::Profit => "profit",
            Feature::RiskPct => "risk (in percent)",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl Strength {
    pub fn from_coefficient(coefficient: f64) -> Self {
        let abs = coefficient.abs();
        if abs >= 0.7 {
            Strength::Strong
        } else if abs >= 0.4 {
            Strength::Moderate
        } else if abs >= 0.2 {
            Strength::Weak
        } else {
            Strength::VeryWeak
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
            Strength::VeryWeak => "very weak",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increases,
    Decreases,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Increases => "increases",
            Direction::Decreases => "decreases",
        })
    }
}

/// Correlation of one feature with margin per hour across all orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginDriver {
    pub feature: Feature,
    /// `None` when the correlation is undefined (too few orders or a constant column).
    pub coefficient: Option<f64>,
    pub strength: Option<Strength>,
    pub direction: Option<Direction>,
}

/// Ranks the raw order attributes by their correlation with margin per hour.
///
/// Sorted by coefficient descending; undefined correlations come last.
pub fn margin_drivers(orders: &[DerivedOrder]) -> Vec<MarginDriver> {
    let target: Vec<f64> = orders
        .iter()
        .map(|d| to_f64(d.metrics.margin_per_hour))
        .collect();

    let mut drivers: Vec<MarginDriver> = Feature::ALL
        .iter()
        .map(|&feature| {
            let values: Vec<f64> = orders.iter().map(|d| feature.extract(d)).collect();
            match stats::pearson(&values, &target) {
                Ok(c) => MarginDriver {
                    feature,
                    coefficient: Some(c),
                    strength: Some(Strength::from_coefficient(c)),
                    direction: Some(if c > 0.0 {
                        Direction::Increases
                    } else {
                        Direction::Decreases
                    }),
                },
                Err(e) => {
                    tracing::debug!(%feature, error = %e, "Margin driver correlation undefined.");
                    MarginDriver {
                        feature,
                        coefficient: None,
                        strength: None,
                        direction: None,
                    }
                }
            }
        })
        .collect();

    drivers.sort_by(|a, b| match (a.coefficient, b.coefficient) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    drivers
}
