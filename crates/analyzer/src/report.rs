use analytics::{CorrelationOutcome, MarginDriver};
use risk::{BadOrderFlag, BottleneckCandidate, ClientSummary, ScoredOrder};
use rust_decimal::Decimal;
use scheduler::ShiftSelection;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Everything one analysis run produces.
///
/// The report is complete when it is handed out: bad orders and the shift plan
/// are computed before any consumer can see them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Every order with its metrics and client-relative scores, in input order.
    pub orders: Vec<ScoredOrder>,
    pub clients: BTreeMap<String, ClientSummary>,
    pub correlations: BTreeMap<String, CorrelationOutcome>,
    pub bad_orders: Vec<BadOrderFlag>,
    pub bottleneck_candidates: Vec<BottleneckCandidate>,
    pub margin_drivers: Vec<MarginDriver>,
    pub shift: ShiftSelection,
    pub thresholds: ReportThresholds,
}

/// The thresholds the flags were computed with, for display next to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportThresholds {
    pub max_risk_fraction: Decimal,
    pub high_risk: u8,
    pub high_variance: f64,
    pub high_gain: u8,
    pub processing_time_quantile: f64,
    pub margin_quantile: f64,
    pub bottleneck_min_risk_pct: Decimal,
}

impl AnalysisReport {
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Distinct orders flagged by at least one policy.
    pub fn flagged_order_count(&self) -> usize {
        self.bad_orders
            .iter()
            .map(|f| f.index)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
