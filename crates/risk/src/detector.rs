use crate::scorer::{ClientSummary, ScoredOrder};
use analytics::stats::{self, to_f64};
use configuration::{BottleneckScreen, ClientPolicy, OrderPolicy};
use core_types::{Gain, Risk};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which of the two bad-order heuristics fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagPolicy {
    /// Order risk >= high_risk and (client variance >= high_variance or order gain >= high_gain).
    ClientSummary,
    /// Order risk fraction strictly above `max_risk_fraction`.
    OrderRisk,
}

impl fmt::Display for FlagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlagPolicy::ClientSummary => "client summary",
            FlagPolicy::OrderRisk => "order risk",
        })
    }
}

/// Informational tag on an order that crossed a heuristic threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadOrderFlag {
    pub index: usize,
    pub order_id: String,
    pub client_id: String,
    pub policy: FlagPolicy,
    pub risk: Risk,
    pub gain: Gain,
    pub risk_pct: Decimal,
    pub client_risk_variance: f64,
}

/// Coarse client classification for the risk and gain view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientClass {
    ProfitableButRisky,
    UnprofitableButStable,
    Strong,
    RiskExposure,
    Neutral,
}

impl fmt::Display for ClientClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClientClass::ProfitableButRisky => "Profitable but risky",
            ClientClass::UnprofitableButStable => "Unprofitable but stable",
            ClientClass::Strong => "Strong client",
            ClientClass::RiskExposure => "Risk exposure",
            ClientClass::Neutral => "Neutral",
        })
    }
}

/// Classifies a client from its summary scores. The first matching rule wins.
pub fn classify_client(policy: &ClientPolicy, risk: Risk, variance: f64, gain: Gain) -> ClientClass {
    let risky = risk.value() >= policy.high_risk || variance >= policy.high_variance;
    let profitable = gain.value() >= policy.high_gain;

    if profitable && risky {
        ClientClass::ProfitableButRisky
    } else if gain.value() <= policy.low_gain
        && risk.value() <= policy.low_risk
        && variance <= policy.low_variance
    {
        ClientClass::UnprofitableButStable
    } else if profitable {
        ClientClass::Strong
    } else if risky {
        ClientClass::RiskExposure
    } else {
        ClientClass::Neutral
    }
}

/// Flags orders under both bad-order policies.
#[derive(Debug, Clone)]
pub struct BadOrderDetector {
    client_policy: ClientPolicy,
    order_policy: OrderPolicy,
}

impl BadOrderDetector {
    pub fn new(client_policy: ClientPolicy, order_policy: OrderPolicy) -> Self {
        Self {
            client_policy,
            order_policy,
        }
    }

    /// Per-client summary heuristic, evaluated for one order.
    pub fn violates_client_policy(&self, risk: Risk, gain: Gain, client_variance: f64) -> bool {
        let p = &self.client_policy;
        risk.value() >= p.high_risk
            && (client_variance >= p.high_variance || gain.value() >= p.high_gain)
    }

    /// Per-order heuristic: risk fraction strictly above the configured maximum.
    ///
    /// The enforced default is 15%. Older report wording describes this
    /// threshold as 50%; only the numeric value here is applied.
    pub fn violates_order_policy(&self, risk_pct: Decimal) -> bool {
        risk_pct / dec!(100) > self.order_policy.max_risk_fraction
    }

    /// Evaluates every order against both policies.
    ///
    /// An order may carry one flag per policy. Flags are ordered by input
    /// position, then policy.
    pub fn detect(
        &self,
        scored: &[ScoredOrder],
        clients: &BTreeMap<String, ClientSummary>,
    ) -> Vec<BadOrderFlag> {
        let mut flags = Vec::new();

        for s in scored {
            let order = &s.derived.order;
            let variance = clients
                .get(&order.client_id)
                .map(|c| c.risk_variance)
                .unwrap_or_default();

            let fired = [
                (FlagPolicy::ClientSummary, self.violates_client_policy(s.risk, s.gain, variance)),
                (FlagPolicy::OrderRisk, self.violates_order_policy(order.risk_pct)),
            ];
            for (policy, hit) in fired {
                if hit {
                    flags.push(BadOrderFlag {
                        index: s.index,
                        order_id: order.order_id.clone(),
                        client_id: order.client_id.clone(),
                        policy,
                        risk: s.risk,
                        gain: s.gain,
                        risk_pct: order.risk_pct,
                        client_risk_variance: variance,
                    });
                }
            }
        }

        tracing::info!(
            flagged = flags.len(),
            client_policy = flags.iter().filter(|f| f.policy == FlagPolicy::ClientSummary).count(),
            order_policy = flags.iter().filter(|f| f.policy == FlagPolicy::OrderRisk).count(),
            "Bad-order detection complete."
        );
        flags
    }
}

/// An order that blocks scarce capacity for little value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleneckCandidate {
    pub index: usize,
    pub order_id: String,
    pub client_id: String,
    pub processing_time_hr: Decimal,
    pub margin_per_hour: Decimal,
    pub risk_pct: Decimal,
}

/// Orders that are long, low-yield and risky relative to the whole table.
///
/// Processing time above the configured upper quantile, margin per hour below
/// the lower quantile and risk above `min_risk_pct`. Sorted by margin per hour,
/// worst first.
pub fn bottleneck_candidates(
    screen: &BottleneckScreen,
    scored: &[ScoredOrder],
) -> Vec<BottleneckCandidate> {
    let times: Vec<f64> = scored
        .iter()
        .map(|s| to_f64(s.derived.order.processing_time_hr))
        .collect();
    let margins: Vec<f64> = scored
        .iter()
        .map(|s| to_f64(s.derived.metrics.margin_per_hour))
        .collect();

    let (Some(time_cut), Some(margin_cut)) = (
        stats::quantile(&times, screen.processing_time_quantile),
        stats::quantile(&margins, screen.margin_quantile),
    ) else {
        return Vec::new();
    };

    let mut candidates: Vec<BottleneckCandidate> = scored
        .iter()
        .zip(times.iter().zip(&margins))
        .filter(|(s, (time, margin))| {
            **time > time_cut
                && **margin < margin_cut
                && s.derived.order.risk_pct > screen.min_risk_pct
        })
        .map(|(s, _)| BottleneckCandidate {
            index: s.index,
            order_id: s.derived.order.order_id.clone(),
            client_id: s.derived.order.client_id.clone(),
            processing_time_hr: s.derived.order.processing_time_hr,
            margin_per_hour: s.derived.metrics.margin_per_hour,
            risk_pct: s.derived.order.risk_pct,
        })
        .collect();

    candidates.sort_by(|a, b| a.margin_per_hour.cmp(&b.margin_per_hour));
    candidates
}
