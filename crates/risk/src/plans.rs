use crate::error::RiskError;
use configuration::{PlanTable, RiskPolicy};
use core_types::{GoalAmount, PlanCategory};
use rust_decimal::Decimal;
use serde::Serialize;

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// The goal that applies to a plan, and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGoal {
    pub plan: String,
    pub goal: GoalAmount,
    pub category: PlanCategory,
    /// True when the plan was unknown and the default goal was used.
    pub is_default: bool,
}

/// A plan tier as shown to the desk, with the daily limits spelled out in currency.
///
/// The limits restate the classifier thresholds against this plan's goal; they
/// are for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: String,
    pub goal: Decimal,
    pub category: PlanCategory,
    pub daily_attention_limit: Decimal,
    pub daily_elimination_limit: Decimal,
}

#[derive(Debug, Clone)]
struct Tier {
    id: String,
    goal: GoalAmount,
    category: PlanCategory,
    attention_limit: Decimal,
    elimination_limit: Decimal,
}

/// Looks up the profit goal of a funded-account plan.
#[derive(Debug, Clone)]
pub struct PlanGoalResolver {
    tiers: Vec<Tier>,
    default_goal: GoalAmount,
}

impl PlanGoalResolver {
    pub fn new(table: &PlanTable, policy: &RiskPolicy) -> Result<Self, RiskError> {
        let default_goal =
            GoalAmount::new(table.default_goal).map_err(|_| RiskError::InvalidPlanGoal {
                plan: "default".to_string(),
                goal: table.default_goal,
            })?;

        let tiers = table
            .tiers
            .iter()
            .map(|tier| -> Result<Tier, RiskError> {
                let goal = GoalAmount::new(tier.goal).map_err(|_| RiskError::InvalidPlanGoal {
                    plan: tier.id.clone(),
                    goal: tier.goal,
                })?;
                let limit = |pct| {
                    percent_of(goal, pct).ok_or_else(|| RiskError::PlanLimitOutOfRange {
                        plan: tier.id.clone(),
                    })
                };
                Ok(Tier {
                    id: tier.id.trim().to_string(),
                    goal,
                    category: tier.category,
                    attention_limit: limit(policy.warning_threshold_pct)?,
                    elimination_limit: limit(policy.violation_threshold_pct)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tiers,
            default_goal,
        })
    }

    pub fn default_goal(&self) -> GoalAmount {
        self.default_goal
    }

    /// Resolves the goal of `plan`, matching tier ids case-insensitively.
    ///
    /// Unknown plans get the default goal and a warning in the log; they never
    /// resolve to a zero goal.
    pub fn resolve(&self, plan: &str) -> ResolvedGoal {
        let wanted = plan.trim();
        match self
            .tiers
            .iter()
            .find(|tier| tier.id.eq_ignore_ascii_case(wanted))
        {
            Some(tier) => ResolvedGoal {
                plan: tier.id.clone(),
                goal: tier.goal,
                category: tier.category,
                is_default: false,
            },
            None => {
                tracing::warn!(
                    plan = wanted,
                    default_goal = %self.default_goal.value(),
                    "Unknown plan, falling back to the default goal."
                );
                ResolvedGoal {
                    plan: wanted.to_string(),
                    goal: self.default_goal,
                    category: PlanCategory::default(),
                    is_default: true,
                }
            }
        }
    }

    /// Every configured tier, in configuration order.
    pub fn summaries(&self) -> Vec<PlanSummary> {
        self.tiers
            .iter()
            .map(|tier| PlanSummary {
                id: tier.id.clone(),
                goal: tier.goal.value(),
                category: tier.category,
                daily_attention_limit: tier.attention_limit,
                daily_elimination_limit: tier.elimination_limit,
            })
            .collect()
    }
}

fn percent_of(goal: GoalAmount, pct: Decimal) -> Option<Decimal> {
    goal.value().checked_mul(pct)?.checked_div(PERCENT)
}
