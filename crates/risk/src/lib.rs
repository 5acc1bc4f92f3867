//! # Funded-Account Policy
//!
//! The three policy tables the analyst applies to a trader's activity:
//!
//! - `CostModel`: what each traded contract costs, by instrument family.
//! - `RiskClassifier`: how a day's result compares to the account goal.
//! - `PlanGoalResolver`: which goal applies to which funded-account plan.
//!
//! All three are built from injected configuration and hold no global state.

pub mod classifier;
pub mod cost_model;
pub mod error;
pub mod plans;

pub use classifier::RiskClassifier;
pub use cost_model::CostModel;
pub use error::RiskError;
pub use plans::{PlanGoalResolver, PlanSummary, ResolvedGoal};
