use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single client order, exactly as it was read from the order table.
///
/// Orders are immutable once created. Everything the analysis needs beyond
/// these fields (contribution margin, margin per hour, scores) is derived on
/// demand and never written back.
///
/// `processing_time_hr` must be strictly positive. The reader rejects rows that
/// break this, and the analysis crates assume it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub client_id: String,
    pub profit: Decimal,
    pub costs: Decimal,
    pub processing_time_hr: Decimal,
    /// Execution/financial risk of the order in percent (0-100).
    pub risk_pct: Decimal,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        client_id: impl Into<String>,
        profit: Decimal,
        costs: Decimal,
        processing_time_hr: Decimal,
        risk_pct: Decimal,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            client_id: client_id.into(),
            profit,
            costs,
            processing_time_hr,
            risk_pct,
        }
    }
}
