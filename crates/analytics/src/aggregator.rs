use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{DailyAggregate, RawOperation};
use risk::CostModel;
use std::collections::BTreeMap;

/// Per-day aggregates keyed by calendar day. Iterates oldest day first.
pub type DailyAggregates = BTreeMap<NaiveDate, DailyAggregate>;

/// Buckets operations by the calendar day they were opened on.
#[derive(Debug, Clone)]
pub struct DailyAggregator {
    cost_model: CostModel,
}

impl DailyAggregator {
    pub fn new(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    /// Accumulates count, gross result and cost for every day present in `operations`.
    ///
    /// Accumulation is a plain sum per day, so the input order never changes
    /// the outcome. Days without operations do not appear in the map. Sums that
    /// leave the `Decimal` range fail with `OutOfRange`.
    pub fn aggregate(&self, operations: &[RawOperation]) -> Result<DailyAggregates, AnalyticsError> {
        let mut days = DailyAggregates::new();

        for operation in operations {
            let out_of_range = |quantity: &'static str| AnalyticsError::OutOfRange {
                date: operation.open_date,
                quantity,
            };
            let cost = self
                .cost_model
                .cost(&operation.asset, operation.traded_quantity())
                .ok_or_else(|| out_of_range("operation cost"))?;

            let day = days
                .entry(operation.open_date)
                .or_insert_with(|| DailyAggregate::new(operation.open_date));

            day.operation_count += 1;
            day.gross_result = day
                .gross_result
                .checked_add(operation.operation_result)
                .ok_or_else(|| out_of_range("gross result"))?;
            day.total_cost = day
                .total_cost
                .checked_add(cost)
                .ok_or_else(|| out_of_range("total cost"))?;
        }

        tracing::debug!(
            operations = operations.len(),
            days = days.len(),
            "Aggregated operations by day."
        );
        Ok(days)
    }
}
