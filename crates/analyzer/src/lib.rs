use crate::error::AnalyzerError;
use analytics::{
    client_correlation, derive_all, margin_drivers, stats::to_f64, CorrelationOutcome,
    DerivedOrder, MarginDriver,
};
use configuration::AnalysisConfig;
use core_types::Order;
use risk::{
    bottleneck_candidates, group_by_client, BadOrderDetector, BadOrderFlag, BottleneckCandidate,
    ClientSummary, RiskGainScorer, ScoredOrder,
};
use scheduler::{ShiftSelection, ShiftSelector};
use std::collections::BTreeMap;

pub mod error;
pub mod report;

pub use report::{AnalysisReport, ReportThresholds};

/// The main analysis engine.
///
/// Holds only configuration; every run recomputes all results from the orders
/// it is given, so analyzing the same table twice yields the same report.
pub struct Analyzer {
    config: AnalysisConfig,
    scorer: RiskGainScorer,
    detector: BadOrderDetector,
    selector: ShiftSelector,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalyzerError> {
        let scorer = RiskGainScorer::new(config.risk_curve.clone())?;
        let detector =
            BadOrderDetector::new(config.client_policy.clone(), config.order_policy.clone());
        let selector = ShiftSelector::new(&config.shift)?;
        Ok(Self {
            config,
            scorer,
            detector,
            selector,
        })
    }

    /// Runs the full pipeline over one order table.
    ///
    /// Every order must have a positive processing time. Metrics that overflow
    /// are returned as an error instead of aborting the run.
    pub fn run(&self, orders: &[Order]) -> Result<AnalysisReport, AnalyzerError> {
        tracing::info!(orders = orders.len(), "Starting order analysis.");

        // 1. Derive
        let derived = derive_all(orders)?;

        // 2. Characteristics driving margin per hour
        let margin_drivers = self.analyze_margin(&derived);

        // 3. Client risk and gain
        let (scored, clients) = self.analyze_clients(&derived)?;
        let correlations = self.correlate_clients(&scored)?;

        // 4. Bad orders, fully computed before the report leaves this function
        let (bad_orders, bottleneck_candidates) = self.analyze_orders(&scored, &clients);

        // 5. Shift
        let shift = self.plan_shift(&derived);

        tracing::info!(
            clients = clients.len(),
            bad_orders = bad_orders.len(),
            shift_orders = shift.orders.len(),
            "Order analysis complete."
        );

        Ok(AnalysisReport {
            orders: scored,
            clients,
            correlations,
            bad_orders,
            bottleneck_candidates,
            margin_drivers,
            shift,
            thresholds: self.thresholds(),
        })
    }

    /// Which order attributes move margin per hour across the whole table.
    pub fn analyze_margin(&self, derived: &[DerivedOrder]) -> Vec<MarginDriver> {
        margin_drivers(derived)
    }

    /// Scores each order within its client and summarizes every client.
    pub fn analyze_clients(
        &self,
        derived: &[DerivedOrder],
    ) -> Result<(Vec<ScoredOrder>, BTreeMap<String, ClientSummary>), AnalyzerError> {
        let scored = self.scorer.score_orders(derived)?;
        let clients = self
            .scorer
            .summarize_clients(&scored, &self.config.client_policy)?;
        Ok((scored, clients))
    }

    /// Risk vs. margin-per-hour correlation for every client.
    pub fn correlate_clients(
        &self,
        scored: &[ScoredOrder],
    ) -> Result<BTreeMap<String, CorrelationOutcome>, AnalyzerError> {
        let mut correlations = BTreeMap::new();
        for (client_id, indices) in group_by_client(scored.iter().map(ScoredOrder::client_id)) {
            let risk: Vec<f64> = indices
                .iter()
                .map(|&i| scored[i].risk.value() as f64)
                .collect();
            let margin: Vec<f64> = indices
                .iter()
                .map(|&i| to_f64(scored[i].derived.metrics.margin_per_hour))
                .collect();

            let outcome = client_correlation(client_id, &risk, &margin)?;
            if let CorrelationOutcome::NotAvailable { reason, .. } = &outcome {
                tracing::warn!(client = %client_id, %reason, "Correlation not available.");
            }
            correlations.insert(client_id.to_string(), outcome);
        }
        Ok(correlations)
    }

    /// Flags bad orders under both policies and screens for bottleneck blockers.
    pub fn analyze_orders(
        &self,
        scored: &[ScoredOrder],
        clients: &BTreeMap<String, ClientSummary>,
    ) -> (Vec<BadOrderFlag>, Vec<BottleneckCandidate>) {
        let flags = self.detector.detect(scored, clients);
        let candidates = bottleneck_candidates(&self.config.bottleneck, scored);
        (flags, candidates)
    }

    /// Greedy shift plan over all orders.
    pub fn plan_shift(&self, derived: &[DerivedOrder]) -> ShiftSelection {
        self.selector.select(derived)
    }

    fn thresholds(&self) -> ReportThresholds {
        let c = &self.config;
        ReportThresholds {
            max_risk_fraction: c.order_policy.max_risk_fraction,
            high_risk: c.client_policy.high_risk,
            high_variance: c.client_policy.high_variance,
            high_gain: c.client_policy.high_gain,
            processing_time_quantile: c.bottleneck.processing_time_quantile,
            margin_quantile: c.bottleneck.margin_quantile,
            bottleneck_min_risk_pct: c.bottleneck.min_risk_pct,
        }
    }
}
