use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One data row of a brokerage operations export, already validated.
///
/// A row only ever records one leg of activity in some exports, so either
/// quantity may be zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperation {
    pub asset: String,
    /// Calendar day the operation was opened on. Time-of-day is not kept.
    pub open_date: NaiveDate,
    pub buy_quantity: Decimal,
    pub sell_quantity: Decimal,
    /// Signed gross result of the operation, in currency units.
    pub operation_result: Decimal,
}

impl RawOperation {
    /// The traded size used for cost purposes: the larger leg, never the sum.
    pub fn traded_quantity(&self) -> Decimal {
        self.buy_quantity.max(self.sell_quantity)
    }
}

/// Accumulated activity for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub operation_count: u32,
    pub gross_result: Decimal,
    pub total_cost: Decimal,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            operation_count: 0,
            gross_result: Decimal::ZERO,
            total_cost: Decimal::ZERO,
        }
    }

    /// Gross result minus costs, or `None` when the difference is out of range.
    pub fn net_result(&self) -> Option<Decimal> {
        self.gross_result.checked_sub(self.total_cost)
    }
}

/// Display metadata of a trader, owned by the back-office records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub plan: String,
    pub platform: String,
}

impl Client {
    /// Stand-in metadata used when the client record cannot be resolved.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Unknown client".to_string(),
            cpf: String::new(),
            plan: String::new(),
            platform: String::new(),
        }
    }
}

/// A strictly positive profit goal in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GoalAmount(Decimal);

impl GoalAmount {
    pub fn new(amount: Decimal) -> Result<Self, CoreError> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "goal amount".to_string(),
                format!("must be greater than zero, got {amount}"),
            ));
        }
        Ok(Self(amount))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
