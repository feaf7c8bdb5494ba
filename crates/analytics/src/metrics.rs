use crate::error::AnalyticsError;
use core_types::Order;
use rust_decimal::Decimal;
use serde::Serialize;

/// Per-order economics derived from the raw order fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderMetrics {
    /// `profit - costs`.
    pub contribution_margin: Decimal,
    /// `contribution_margin / processing_time_hr`.
    pub margin_per_hour: Decimal,
}

/// An order paired with its derived metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedOrder {
    pub order: Order,
    pub metrics: OrderMetrics,
}

/// Computes contribution margin and margin per hour for one order.
///
/// The caller must guarantee `processing_time_hr > 0`; the file reader rejects
/// other rows before they reach the analysis. Results that do not fit in a
/// `Decimal` are returned as `AnalyticsError::Calculation`.
pub fn derive_metrics(order: &Order) -> Result<OrderMetrics, AnalyticsError> {
    let contribution_margin = order.profit.checked_sub(order.costs).ok_or_else(|| {
        AnalyticsError::Calculation(format!(
            "contribution margin of order {} overflows",
            order.order_id
        ))
    })?;
    let margin_per_hour = contribution_margin
        .checked_div(order.processing_time_hr)
        .ok_or_else(|| {
            AnalyticsError::Calculation(format!(
                "margin per hour of order {} is undefined for {} hours",
                order.order_id, order.processing_time_hr
            ))
        })?;

    Ok(OrderMetrics {
        contribution_margin,
        margin_per_hour,
    })
}

/// Derives metrics for every order, preserving input order.
pub fn derive_all(orders: &[Order]) -> Result<Vec<DerivedOrder>, AnalyticsError> {
    orders
        .iter()
        .map(|order| {
            Ok(DerivedOrder {
                order: order.clone(),
                metrics: derive_metrics(order)?,
            })
        })
        .collect()
}
