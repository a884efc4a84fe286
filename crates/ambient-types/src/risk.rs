use serde::{Deserialize, Serialize};

use crate::decision::ActionModule;

/// How much autonomy a draft may be granted. Derived deterministically
/// from the draft's domain risk function — never user-settable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one commit attempt. Created once, immutable afterward —
/// a failed or anomalous commit is never silently retried.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AutoCommitResult {
    pub executed: bool,
    pub module: ActionModule,
    pub risk_tier: RiskTier,
    /// The confidence bar that had to be cleared.
    pub dynamic_threshold: f64,
    pub confidence: f64,
    /// External record identifier from the domain writer, if any.
    pub external_id: Option<String>,
    /// Terse machine tag, e.g. `committed` or `below_threshold`.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_is_monotonic() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
    }

    #[test]
    fn tier_tags() {
        assert_eq!(RiskTier::Low.as_str(), "low");
        assert_eq!(
            serde_json::to_string(&RiskTier::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn result_serialization() {
        let result = AutoCommitResult {
            executed: true,
            module: ActionModule::Finance,
            risk_tier: RiskTier::Low,
            dynamic_threshold: 0.88,
            confidence: 0.91,
            external_id: Some("fin-0001".into()),
            reason: "committed".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let restored: AutoCommitResult = serde_json::from_str(&json).unwrap();
        assert!(restored.executed);
        assert_eq!(restored.risk_tier, RiskTier::Low);
    }
}
