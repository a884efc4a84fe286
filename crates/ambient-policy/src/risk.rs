//! Deterministic risk classification and the tier threshold table.

use ambient_types::{CryptoAction, ModuleDraft, RiskTier};

use crate::error::PolicyError;

/// Finance amount bands (in the draft's currency).
const FINANCE_LOW_CEILING: f64 = 50.0;
const FINANCE_MEDIUM_CEILING: f64 = 200.0;

/// Map a draft to its risk tier. Purely rule-based: the same draft
/// always lands in the same tier.
pub fn classify_risk(draft: &ModuleDraft) -> RiskTier {
    match draft {
        ModuleDraft::Finance(finance) => {
            // A missing amount cannot auto-commit anyway; treat it as
            // the cautious end of the scale.
            let amount = finance.amount.unwrap_or(f64::MAX);
            if amount <= FINANCE_LOW_CEILING {
                RiskTier::Low
            } else if amount <= FINANCE_MEDIUM_CEILING {
                RiskTier::Medium
            } else {
                RiskTier::High
            }
        }
        ModuleDraft::Todo(_) => RiskTier::Low,
        ModuleDraft::Crypto(crypto) => match crypto.action {
            Some(CryptoAction::Hold) => RiskTier::Low,
            Some(CryptoAction::Swap) => RiskTier::Medium,
            Some(CryptoAction::Buy) | Some(CryptoAction::Sell) | None => RiskTier::High,
        },
        ModuleDraft::Link(_) => RiskTier::Low,
    }
}

/// Per-tier confidence bars. The ordering low <= medium <= high is an
/// invariant, enforced at construction rather than assumed.
#[derive(Clone, Copy, Debug)]
pub struct RiskThresholds {
    low: f64,
    medium: f64,
    high: f64,
}

impl RiskThresholds {
    pub fn new(low: f64, medium: f64, high: f64) -> Result<Self, PolicyError> {
        for value in [low, medium, high] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::ThresholdOutOfRange(value));
            }
        }
        if !(low <= medium && medium <= high) {
            return Err(PolicyError::NonMonotonicThresholds { low, medium, high });
        }
        Ok(Self { low, medium, high })
    }

    pub fn threshold(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: 0.88,
            medium: 0.92,
            high: 0.97,
        }
    }
}
