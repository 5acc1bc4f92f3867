use chrono::NaiveDate;
use core_types::RiskLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day scored against the goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResult {
    pub date: NaiveDate,
    /// Number of operations opened that day.
    pub operations: u32,
    /// Gross result, before costs.
    pub result: Decimal,
    pub costs: Decimal,
    pub net_result: Decimal,
    /// |net result| as a percentage of the goal.
    pub percent_of_goal: Decimal,
    pub risk_level: RiskLevel,
}

/// A day that crossed the warning or violation threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedDay {
    pub date: NaiveDate,
    pub result: Decimal,
    pub net_result: Decimal,
    pub percent_of_goal: Decimal,
    #[serde(rename = "type")]
    pub kind: RiskLevel,
}

impl From<&DailyResult> for FlaggedDay {
    fn from(day: &DailyResult) -> Self {
        Self {
            date: day.date,
            result: day.result,
            net_result: day.net_result,
            percent_of_goal: day.percent_of_goal,
            kind: day.risk_level,
        }
    }
}

/// Totals over every trading day in the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetrics {
    pub days_operated: usize,
    /// Sorted by date, oldest first.
    pub daily_results: Vec<DailyResult>,
    pub total_result: Decimal,
    pub total_costs: Decimal,
    pub total_net_result: Decimal,
    pub goal_amount: Decimal,
}

/// The qualification criteria, each evaluated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub minimum_days: bool,
    pub total_goal_reached: bool,
    pub daily_limit_respected: bool,
    pub approved: bool,
}

impl ValidationVerdict {
    pub fn new(minimum_days: bool, total_goal_reached: bool, daily_limit_respected: bool) -> Self {
        Self {
            minimum_days,
            total_goal_reached,
            daily_limit_respected,
            approved: minimum_days && total_goal_reached && daily_limit_respected,
        }
    }
}
