use crate::error::RiskError;
use configuration::RiskPolicy;
use core_types::RiskLevel;
use rust_decimal::Decimal;

/// Sorts a day into a risk tier by how large its result is relative to the goal.
///
/// Both boundaries are inclusive on the lower tier: exactly the warning
/// threshold is still `Safe`, exactly the violation threshold is still `Warning`.
#[derive(Debug, Clone, Copy)]
pub struct RiskClassifier {
    warning_threshold_pct: Decimal,
    violation_threshold_pct: Decimal,
}

impl RiskClassifier {
    pub fn new(policy: &RiskPolicy) -> Result<Self, RiskError> {
        if policy.warning_threshold_pct < Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "warning_threshold_pct must not be negative".to_string(),
            ));
        }
        if policy.violation_threshold_pct < policy.warning_threshold_pct {
            return Err(RiskError::InvalidParameters(
                "violation_threshold_pct must not be below warning_threshold_pct".to_string(),
            ));
        }
        Ok(Self {
            warning_threshold_pct: policy.warning_threshold_pct,
            violation_threshold_pct: policy.violation_threshold_pct,
        })
    }

    /// Classifies a result expressed as a percentage of the goal. The sign is ignored.
    pub fn classify(&self, percent_of_goal: Decimal) -> RiskLevel {
        let magnitude = percent_of_goal.abs();
        if magnitude <= self.warning_threshold_pct {
            RiskLevel::Safe
        } else if magnitude <= self.violation_threshold_pct {
            RiskLevel::Warning
        } else {
            RiskLevel::Violation
        }
    }
}
