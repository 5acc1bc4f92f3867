use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Risk parameters from configuration are invalid: {0}")]
    InvalidParameters(String),

    #[error("Plan '{plan}' has a goal of {goal}, goals must be greater than zero.")]
    InvalidPlanGoal { plan: String, goal: Decimal },

    #[error("Plan '{plan}' has a goal too large to derive its daily limits from.")]
    PlanLimitOutOfRange { plan: String },
}
