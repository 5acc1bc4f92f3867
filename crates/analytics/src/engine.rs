use crate::aggregator::DailyAggregates;
use crate::error::AnalyticsError;
use crate::report::{AnalysisMetrics, DailyResult, FlaggedDay, ValidationVerdict};
use configuration::RiskPolicy;
use core_types::{GoalAmount, RiskLevel};
use risk::RiskClassifier;
use rust_decimal::Decimal;

/// Everything the evaluator derives from one trader's daily aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub metrics: AnalysisMetrics,
    pub validation: ValidationVerdict,
    /// Violation-tier days, oldest first.
    pub violations: Vec<FlaggedDay>,
    /// Warning-tier days, oldest first.
    pub warnings: Vec<FlaggedDay>,
}

/// A stateless judge of daily performance against a funded-account goal.
#[derive(Debug, Clone)]
pub struct PerformanceEvaluator {
    classifier: RiskClassifier,
    minimum_days: usize,
}

impl PerformanceEvaluator {
    pub fn new(classifier: RiskClassifier, minimum_days: usize) -> Self {
        Self {
            classifier,
            minimum_days,
        }
    }

    pub fn from_policy(policy: &RiskPolicy) -> Result<Self, AnalyticsError> {
        let classifier = RiskClassifier::new(policy)?;
        Ok(Self::new(classifier, policy.minimum_days))
    }

    /// Scores every day, totals the period and applies the qualification criteria.
    ///
    /// Only violation-tier days fail the daily limit. Warning-tier days are
    /// reported but never disqualify on their own. A goal so small that a day's
    /// percentage leaves the `Decimal` range is reported as `OutOfRange`.
    pub fn evaluate(
        &self,
        aggregates: &DailyAggregates,
        goal: GoalAmount,
    ) -> Result<Evaluation, AnalyticsError> {
        let goal_amount = goal.value();

        // `DailyAggregates` iterates by ascending date, which is the order we report in.
        let daily_results = aggregates
            .values()
            .map(|day| -> Result<DailyResult, AnalyticsError> {
                let out_of_range = |quantity: &'static str| AnalyticsError::OutOfRange {
                    date: day.date,
                    quantity,
                };
                let net_result = day.net_result().ok_or_else(|| out_of_range("net result"))?;
                let percent_of_goal = net_result
                    .abs()
                    .checked_div(goal_amount)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or_else(|| out_of_range("percent of goal"))?;
                Ok(DailyResult {
                    date: day.date,
                    operations: day.operation_count,
                    result: day.gross_result,
                    costs: day.total_cost,
                    net_result,
                    percent_of_goal,
                    risk_level: self.classifier.classify(percent_of_goal),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_result = checked_total(daily_results.iter().map(|d| d.result), "total result")?;
        let total_costs = checked_total(daily_results.iter().map(|d| d.costs), "total costs")?;
        let total_net_result = total_result
            .checked_sub(total_costs)
            .ok_or(AnalyticsError::TotalOutOfRange("total net result"))?;
        let days_operated = daily_results.len();

        let mut violations = Vec::new();
        let mut warnings = Vec::new();
        for day in daily_results.iter().filter(|d| d.risk_level.is_flagged()) {
            if day.risk_level == RiskLevel::Violation {
                violations.push(FlaggedDay::from(day));
            } else {
                warnings.push(FlaggedDay::from(day));
            }
        }

        let validation = ValidationVerdict::new(
            days_operated >= self.minimum_days,
            total_net_result >= goal_amount,
            violations.is_empty(),
        );

        Ok(Evaluation {
            metrics: AnalysisMetrics {
                days_operated,
                daily_results,
                total_result,
                total_costs,
                total_net_result,
                goal_amount,
            },
            validation,
            violations,
            warnings,
        })
    }
}

fn checked_total(
    mut values: impl Iterator<Item = Decimal>,
    quantity: &'static str,
) -> Result<Decimal, AnalyticsError> {
    values
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or(AnalyticsError::TotalOutOfRange(quantity))
}
