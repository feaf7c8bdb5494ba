use crate::error::SchedulerError;
use analytics::DerivedOrder;
use configuration::ShiftSettings;
use rust_decimal::Decimal;
use serde::Serialize;

/// The orders chosen for one shift, in the order they were picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftSelection {
    pub orders: Vec<DerivedOrder>,
    pub total_processing_time_hr: Decimal,
    pub total_contribution_margin: Decimal,
    pub capacity_hr: Decimal,
    /// Orders that did not fit, in scan order.
    pub skipped_order_ids: Vec<String>,
}

impl ShiftSelection {
    fn empty(capacity_hr: Decimal) -> Self {
        Self {
            orders: Vec::new(),
            total_processing_time_hr: Decimal::ZERO,
            total_contribution_margin: Decimal::ZERO,
            capacity_hr,
            skipped_order_ids: Vec::new(),
        }
    }

    pub fn remaining_hr(&self) -> Decimal {
        self.capacity_hr - self.total_processing_time_hr
    }
}

/// Fills a shift by margin-per-hour density.
///
/// This is the classic greedy approximation of 0/1 knapsack: orders are taken
/// best density first and anything that does not fit is skipped, without
/// backtracking. It is not optimal in general.
#[derive(Debug, Clone)]
pub struct ShiftSelector {
    capacity_hr: Decimal,
}

impl ShiftSelector {
    pub fn new(settings: &ShiftSettings) -> Result<Self, SchedulerError> {
        if settings.capacity_hr <= Decimal::ZERO {
            return Err(SchedulerError::InvalidCapacity(settings.capacity_hr));
        }
        Ok(Self {
            capacity_hr: settings.capacity_hr,
        })
    }

    pub fn capacity_hr(&self) -> Decimal {
        self.capacity_hr
    }

    /// Selects orders for one shift.
    ///
    /// Orders are ranked by margin per hour, highest first. The sort is stable,
    /// so equal densities keep their input order and the result is
    /// deterministic. Cumulative processing time never exceeds the capacity.
    pub fn select(&self, orders: &[DerivedOrder]) -> ShiftSelection {
        let mut ranked: Vec<&DerivedOrder> = orders.iter().collect();
        ranked.sort_by(|a, b| b.metrics.margin_per_hour.cmp(&a.metrics.margin_per_hour));

        let mut selection = ShiftSelection::empty(self.capacity_hr);
        for candidate in ranked {
            let hours = candidate.order.processing_time_hr;
            if selection.total_processing_time_hr + hours <= self.capacity_hr {
                selection.total_processing_time_hr += hours;
                selection.total_contribution_margin += candidate.metrics.contribution_margin;
                selection.orders.push(candidate.clone());
            } else {
                tracing::debug!(
                    order = %candidate.order.order_id,
                    hours = %hours,
                    remaining = %selection.remaining_hr(),
                    "Order does not fit into the shift."
                );
                selection.skipped_order_ids.push(candidate.order.order_id.clone());
            }
        }

        tracing::info!(
            selected = selection.orders.len(),
            skipped = selection.skipped_order_ids.len(),
            hours = %selection.total_processing_time_hr,
            margin = %selection.total_contribution_margin,
            "Shift planned."
        );
        selection
    }
}
