use crate::error::AnalyticsError;
use crate::stats;
use serde::Serialize;

/// Pearson coefficient between RISK and margin per hour for one client.
///
/// Describes association only. A strong coefficient says nothing about whether
/// risk causes the margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub client_id: String,
    pub coefficient: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    Available(CorrelationResult),
    /// Fewer than two orders, or one of the series is constant.
    NotAvailable { client_id: String, reason: String },
}

impl CorrelationOutcome {
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            CorrelationOutcome::Available(r) => Some(r.coefficient),
            CorrelationOutcome::NotAvailable { .. } => None,
        }
    }
}

/// Correlates one client's order risk scores with their margin per hour.
///
/// Insufficient data is reported as `NotAvailable`, never as a number.
/// A length mismatch between the two series is a programming error and is
/// returned as `Err`.
pub fn client_correlation(
    client_id: &str,
    risk: &[f64],
    margin_per_hour: &[f64],
) -> Result<CorrelationOutcome, AnalyticsError> {
    match stats::pearson(risk, margin_per_hour) {
        Ok(coefficient) => Ok(CorrelationOutcome::Available(CorrelationResult {
            client_id: client_id.to_string(),
            coefficient,
            sample_size: risk.len(),
        })),
        Err(AnalyticsError::NotEnoughData(_)) => Ok(CorrelationOutcome::NotAvailable {
            client_id: client_id.to_string(),
            reason: format!("insufficient data: {} order(s)", risk.len()),
        }),
        Err(AnalyticsError::ZeroVariance(series)) => {
            let which = if series == "x" { "risk" } else { "margin per hour" };
            Ok(CorrelationOutcome::NotAvailable {
                client_id: client_id.to_string(),
                reason: format!("insufficient data: {which} does not vary"),
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_linear_points_are_perfectly_correlated() {
        let outcome = client_correlation("c1", &[3.0, 8.0], &[10.0, 20.0]).unwrap();
        assert_eq!(outcome.coefficient(), Some(1.0));

        let outcome = client_correlation("c1", &[3.0, 8.0], &[20.0, 10.0]).unwrap();
        assert_eq!(outcome.coefficient(), Some(-1.0));
    }

    #[test]
    fn single_order_is_not_available() {
        let outcome = client_correlation("solo", &[5.0], &[12.0]).unwrap();
        match outcome {
            CorrelationOutcome::NotAvailable { client_id, reason } => {
                assert_eq!(client_id, "solo");
                assert!(reason.contains("insufficient data"));
            }
            other => panic!("expected NotAvailable, got {other:?}"),
        }
    }

    #[test]
    fn constant_risk_is_not_available() {
        let outcome = client_correlation("flat", &[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(outcome.coefficient(), None);
    }

    #[test]
    fn empty_client_is_not_available() {
        let outcome = client_correlation("none", &[], &[]).unwrap();
        assert_eq!(outcome.coefficient(), None);
    }
}
