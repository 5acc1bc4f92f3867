use serde::{Deserialize, Serialize};

/// The risk tier a single trading day falls into, relative to the account goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Warning,
    Violation,
}

impl RiskLevel {
    /// Whether this tier has to be reported to the desk at all.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, RiskLevel::Safe)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Warning => "warning",
            RiskLevel::Violation => "violation",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a funded-account plan is operated.
///
/// Plans used to be told apart by looking for "DIRETO" or "MGT" inside the plan
/// name; the category is now an explicit tag on each plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanCategory {
    /// Regular evaluation plan.
    #[default]
    Standard,
    /// Direct funding, no evaluation phase.
    Direct,
    /// Managed account.
    Managed,
}

impl PlanCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanCategory::Standard => "standard",
            PlanCategory::Direct => "direct",
            PlanCategory::Managed => "managed",
        }
    }
}

impl std::fmt::Display for PlanCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_the_serialized_tag() {
        for category in [PlanCategory::Standard, PlanCategory::Direct, PlanCategory::Managed] {
            let tag = serde_json::to_value(category).unwrap();
            assert_eq!(tag, category.to_string());
        }
        for level in [RiskLevel::Safe, RiskLevel::Warning, RiskLevel::Violation] {
            let tag = serde_json::to_value(level).unwrap();
            assert_eq!(tag, level.to_string());
        }
    }

    #[test]
    fn only_safe_days_go_unflagged() {
        assert!(!RiskLevel::Safe.is_flagged());
        assert!(RiskLevel::Warning.is_flagged());
        assert!(RiskLevel::Violation.is_flagged());
    }
}
