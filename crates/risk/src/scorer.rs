use crate::detector::{classify_client, ClientClass};
use crate::error::RiskError;
use analytics::stats::{self, to_f64};
use analytics::DerivedOrder;
use configuration::{ClientPolicy, RiskCurve};
use core_types::{Gain, Risk};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Score given when a client's margin band collapses to a single value.
const NEUTRAL_GAIN: i64 = 5;

/// An order with its client-relative scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredOrder {
    /// Position of the order in the input table.
    pub index: usize,
    pub derived: DerivedOrder,
    pub risk: Risk,
    pub gain: Gain,
}

impl ScoredOrder {
    pub fn client_id(&self) -> &str {
        &self.derived.order.client_id
    }
}

/// Summary statistics of one client group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    pub client_id: String,
    pub order_count: usize,
    pub mean_risk_pct: f64,
    /// Risk curve applied to `mean_risk_pct`.
    pub risk: Risk,
    /// Population variance of the client's risk percentages.
    pub risk_variance: f64,
    /// Mean margin per hour placed in the client's own 10th-90th percentile band.
    pub gain: Gain,
    pub mean_order_gain: f64,
    pub avg_margin_per_hour: f64,
    pub margin_per_hour_variance: f64,
    pub total_contribution_margin: Decimal,
    pub class: ClientClass,
}

/// Produces RISK and GAIN scores, always relative to the order's client group.
#[derive(Debug, Clone)]
pub struct RiskGainScorer {
    curve: RiskCurve,
}

impl RiskGainScorer {
    pub fn new(curve: RiskCurve) -> Result<Self, RiskError> {
        if !curve.scale_pct.is_finite() || curve.scale_pct <= 0.0 {
            return Err(RiskError::InvalidParameters(format!(
                "risk curve scale must be positive, got {}",
                curve.scale_pct
            )));
        }
        Ok(Self { curve })
    }

    /// Maps a risk percentage onto the 1-10 scale with a saturating exponential.
    ///
    /// `1 + 9 * (1 - exp(-pct / scale))`, rounded. Most of the scale is used by
    /// the low end of the input; with the default scale the score is already 10
    /// at about 43% risk.
    pub fn risk_score(&self, risk_pct: f64) -> Result<Risk, RiskError> {
        let raw = 1.0 + 9.0 * (1.0 - (-risk_pct / self.curve.scale_pct).exp());
        if !raw.is_finite() {
            return Err(RiskError::Calculation(format!(
                "risk curve produced {raw} for {risk_pct}%"
            )));
        }
        Ok(Risk::new(raw.round() as i64)?)
    }

    /// Percentile rank of each margin within the given group, scaled to 1-10.
    ///
    /// Ranks are taken over the distinct margins, so the best order gets 10 and
    /// every order tied for worst gets 1. A group with a single distinct margin
    /// is its own 100th percentile.
    pub fn percentile_gains(&self, margins: &[Decimal]) -> Result<Vec<Gain>, RiskError> {
        let mut distinct = margins.to_vec();
        distinct.sort();
        distinct.dedup();
        if distinct.len() <= 1 {
            return Ok(vec![Gain::max(); margins.len()]);
        }

        let steps = (distinct.len() - 1) as f64;
        margins
            .iter()
            .map(|m| -> Result<Gain, RiskError> {
                let below = distinct.partition_point(|other| other < m);
                let pct = below as f64 / steps;
                Ok(Gain::new((1.0 + 9.0 * pct).round() as i64)?)
            })
            .collect()
    }

    /// Client-level gain: where the mean margin per hour falls between the
    /// client's own 10th and 90th percentile.
    ///
    /// Means outside the band saturate at its edges.
    pub fn client_gain(&self, margins_per_hour: &[f64]) -> Result<Gain, RiskError> {
        let avg = stats::mean(margins_per_hour)
            .ok_or_else(|| RiskError::Calculation("client without orders".to_string()))?;
        let p10 = stats::quantile(margins_per_hour, 0.10).unwrap_or(avg);
        let p90 = stats::quantile(margins_per_hour, 0.90).unwrap_or(avg);

        if p90 == p10 {
            return Ok(Gain::new(NEUTRAL_GAIN)?);
        }
        let position = ((avg - p10) / (p90 - p10)).clamp(0.0, 1.0);
        Ok(Gain::new((1.0 + 9.0 * position).round() as i64)?)
    }

    /// Scores every order against its own client group.
    ///
    /// The result is in input order.
    pub fn score_orders(&self, orders: &[DerivedOrder]) -> Result<Vec<ScoredOrder>, RiskError> {
        let mut gains: Vec<Option<Gain>> = vec![None; orders.len()];
        for indices in group_by_client(orders.iter().map(|d| d.order.client_id.as_str())).values() {
            let margins: Vec<Decimal> = indices
                .iter()
                .map(|&i| orders[i].metrics.margin_per_hour)
                .collect();
            for (&i, gain) in indices.iter().zip(self.percentile_gains(&margins)?) {
                gains[i] = Some(gain);
            }
        }

        orders
            .iter()
            .zip(gains)
            .enumerate()
            .map(|(index, (derived, gain))| {
                let risk_pct = to_f64(derived.order.risk_pct);
                if !(0.0..=100.0).contains(&risk_pct) {
                    return Err(RiskError::SignalOutOfRange {
                        order_id: derived.order.order_id.clone(),
                        value: risk_pct,
                    });
                }
                let gain = gain.ok_or_else(|| {
                    RiskError::Calculation(format!("order {index} was not assigned a gain"))
                })?;
                Ok(ScoredOrder {
                    index,
                    derived: derived.clone(),
                    risk: self.risk_score(risk_pct)?,
                    gain,
                })
            })
            .collect()
    }

    /// Builds one summary per client, keyed by client id.
    pub fn summarize_clients(
        &self,
        scored: &[ScoredOrder],
        policy: &ClientPolicy,
    ) -> Result<BTreeMap<String, ClientSummary>, RiskError> {
        let mut summaries = BTreeMap::new();

        for (client_id, indices) in group_by_client(scored.iter().map(ScoredOrder::client_id)) {
            let group: Vec<&ScoredOrder> = indices.iter().map(|&i| &scored[i]).collect();

            let risk_pcts: Vec<f64> = group.iter().map(|s| to_f64(s.derived.order.risk_pct)).collect();
            let margins: Vec<f64> = group
                .iter()
                .map(|s| to_f64(s.derived.metrics.margin_per_hour))
                .collect();
            let order_gains: Vec<f64> = group.iter().map(|s| s.gain.value() as f64).collect();

            let mean_risk_pct = stats::mean(&risk_pcts).unwrap_or_default();
            let risk_variance = stats::population_variance(&risk_pcts).unwrap_or_default();
            let risk = self.risk_score(mean_risk_pct)?;
            let gain = self.client_gain(&margins)?;

            let summary = ClientSummary {
                client_id: client_id.to_string(),
                order_count: group.len(),
                mean_risk_pct,
                risk,
                risk_variance,
                gain,
                mean_order_gain: stats::mean(&order_gains).unwrap_or_default(),
                avg_margin_per_hour: stats::mean(&margins).unwrap_or_default(),
                margin_per_hour_variance: stats::population_variance(&margins).unwrap_or_default(),
                total_contribution_margin: group
                    .iter()
                    .map(|s| s.derived.metrics.contribution_margin)
                    .sum(),
                class: classify_client(policy, risk, risk_variance, gain),
            };
            tracing::debug!(
                client = %summary.client_id,
                orders = summary.order_count,
                risk = %summary.risk,
                gain = %summary.gain,
                variance = summary.risk_variance,
                "Client summarized."
            );
            summaries.insert(summary.client_id.clone(), summary);
        }

        Ok(summaries)
    }
}

/// Groups positions by client id, preserving input order inside each group.
pub fn group_by_client<'a>(
    client_ids: impl Iterator<Item = &'a str>,
) -> BTreeMap<&'a str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, client_id) in client_ids.enumerate() {
        groups.entry(client_id).or_default().push(i);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::derive_all;
    use core_types::Order;
    use rust_decimal_macros::dec;

    fn scorer() -> RiskGainScorer {
        RiskGainScorer::new(RiskCurve::default()).unwrap()
    }

    #[test]
    fn risk_curve_spans_the_scale() {
        let s = scorer();
        assert_eq!(s.risk_score(0.0).unwrap().value(), 1);
        assert_eq!(s.risk_score(100.0).unwrap().value(), 10);
    }

    #[test]
    fn risk_curve_is_monotonic() {
        let s = scorer();
        let mut previous = 0;
        for pct in 0..=100 {
            let risk = s.risk_score(pct as f64).unwrap().value();
            assert!(risk >= previous, "risk dropped at {pct}%");
            previous = risk;
        }
    }

    #[test]
    fn risk_curve_saturates_by_half_scale() {
        let s = scorer();
        for pct in [45.0, 50.0, 75.0] {
            assert_eq!(s.risk_score(pct).unwrap().value(), 10, "at {pct}%");
        }
        // most of the range is consumed early
        assert!(s.risk_score(15.0).unwrap().value() >= 6);
    }

    #[test]
    fn negative_signal_is_rejected_not_clamped() {
        assert!(matches!(
            scorer().risk_score(-20.0),
            Err(RiskError::Score(_))
        ));
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(RiskGainScorer::new(RiskCurve { scale_pct: 0.0 }).is_err());
    }

    #[test]
    fn percentile_gain_extremes() {
        let gains = scorer()
            .percentile_gains(&[dec!(5), dec!(50), dec!(20), dec!(35)])
            .unwrap();
        let values: Vec<u8> = gains.iter().map(|g| g.value()).collect();
        assert_eq!(values, vec![1, 10, 4, 7]);
    }

    #[test]
    fn single_order_group_gets_max_gain() {
        let gains = scorer().percentile_gains(&[dec!(-12)]).unwrap();
        assert_eq!(gains, vec![Gain::max()]);
    }

    #[test]
    fn tied_group_shares_the_top_rank() {
        let gains = scorer().percentile_gains(&[dec!(7), dec!(7), dec!(7)]).unwrap();
        assert!(gains.iter().all(|g| *g == Gain::max()));
    }

    #[test]
    fn orders_tied_for_worst_get_the_minimum() {
        let gains = scorer()
            .percentile_gains(&[dec!(5), dec!(5), dec!(5), dec!(5), dec!(100)])
            .unwrap();
        let values: Vec<u8> = gains.iter().map(|g| g.value()).collect();
        assert_eq!(values, vec![1, 1, 1, 1, 10]);

        let gains = scorer()
            .percentile_gains(&[dec!(1), dec!(9), dec!(1), dec!(5), dec!(9)])
            .unwrap();
        let values: Vec<u8> = gains.iter().map(|g| g.value()).collect();
        assert_eq!(values, vec![1, 10, 1, 6, 10]);
    }

    #[test]
    fn gains_are_relative_to_each_client() {
        let orders = derive_all(&[
            Order::new("a1", "A", dec!(100), dec!(0), dec!(1), dec!(10)),
            Order::new("b1", "B", dec!(10), dec!(0), dec!(1), dec!(10)),
            Order::new("a2", "A", dec!(200), dec!(0), dec!(1), dec!(10)),
            Order::new("b2", "B", dec!(5), dec!(0), dec!(1), dec!(10)),
        ]).unwrap();
        let scored = scorer().score_orders(&orders).unwrap();

        // b1 earns far less than a1 but tops its own client
        assert_eq!(scored[1].gain.value(), 10);
        assert_eq!(scored[0].gain.value(), 1);
        assert_eq!(scored[2].gain.value(), 10);
        assert_eq!(scored[3].gain.value(), 1);
        assert_eq!(scored.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn risk_signal_above_hundred_is_rejected() {
        let orders = derive_all(&[Order::new("x", "A", dec!(1), dec!(0), dec!(1), dec!(120))]).unwrap();
        assert!(matches!(
            scorer().score_orders(&orders),
            Err(RiskError::SignalOutOfRange { .. })
        ));
    }

    #[test]
    fn client_gain_uses_band_and_neutral_fallback() {
        let s = scorer();
        assert_eq!(s.client_gain(&[10.0, 10.0]).unwrap().value(), 5);
        // mean 63.3 inside band [18, 98] -> position 0.57 -> 6
        assert_eq!(s.client_gain(&[0.0, 90.0, 100.0]).unwrap().value(), 6);
        // a mean below the 10th percentile saturates at the bottom
        let skewed = [-1000.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(s.client_gain(&skewed).unwrap().value(), 1);
        assert!(s.client_gain(&[]).is_err());
    }

    #[test]
    fn client_summary_statistics() {
        let orders = derive_all(&[
            Order::new("1", "A", dec!(100), dec!(20), dec!(2), dec!(10)),
            Order::new("2", "A", dec!(300), dec!(60), dec!(4), dec!(30)),
            Order::new("3", "B", dec!(50), dec!(10), dec!(1), dec!(0)),
        ]).unwrap();
        let s = scorer();
        let scored = s.score_orders(&orders).unwrap();
        let summaries = s.summarize_clients(&scored, &ClientPolicy::default()).unwrap();

        assert_eq!(summaries.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        let a = &summaries["A"];
        assert_eq!(a.order_count, 2);
        assert_eq!(a.mean_risk_pct, 20.0);
        assert_eq!(a.risk_variance, 100.0);
        assert_eq!(a.total_contribution_margin, dec!(320));
        assert_eq!(a.avg_margin_per_hour, 50.0);
        assert_eq!(a.risk, s.risk_score(20.0).unwrap());

        let b = &summaries["B"];
        assert_eq!(b.risk.value(), 1);
        assert_eq!(b.risk_variance, 0.0);
        assert_eq!(b.gain.value(), 5);
    }
}
