//! Spending velocity: flag a short-term burn rate well above the
//! monthly baseline.

use std::collections::BTreeMap;

use ambient_types::{Deduction, DeductionKind};

use crate::error::LookupError;
use crate::traits::HistoryLookup;

pub async fn deduce(
    history: &dyn HistoryLookup,
    ratio_threshold: f64,
) -> Result<Option<Deduction>, LookupError> {
    let rate_7d = history.daily_expense_rate(7).await?;
    let rate_30d = history.daily_expense_rate(30).await?;
    if rate_30d <= f64::EPSILON {
        return Ok(None);
    }

    let ratio = rate_7d / rate_30d;
    if ratio < ratio_threshold {
        return Ok(None);
    }

    let confidence = (0.60 + 0.15 * (ratio - ratio_threshold)).min(0.88);

    let mut mutations = BTreeMap::new();
    mutations.insert("velocity_ratio".to_string(), serde_json::json!(ratio));
    mutations.insert("rate_7d".to_string(), serde_json::json!(rate_7d));
    mutations.insert("rate_30d".to_string(), serde_json::json!(rate_30d));

    Ok(Some(Deduction {
        kind: DeductionKind::SpendingVelocity,
        confidence,
        summary: format!(
            "7-day spend rate {rate_7d:.2}/day is {ratio:.2}x the 30-day rate {rate_30d:.2}/day"
        ),
        mutations,
        memory_record: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockHistory;

    #[tokio::test]
    async fn elevated_ratio_fires_anomaly() {
        // 40/day vs 20/day = 2.0x.
        let history = MockHistory::new().with_rates(40.0, 20.0);
        let deduction = deduce(&history, 1.5).await.unwrap().expect("should fire");
        assert_eq!(deduction.kind, DeductionKind::SpendingVelocity);
        // 0.60 + 0.15 * (2.0 - 1.5)
        assert!((deduction.confidence - 0.675).abs() < 1e-9);
        assert_eq!(deduction.mutations["velocity_ratio"], serde_json::json!(2.0));
    }

    #[tokio::test]
    async fn normal_ratio_is_quiet() {
        let history = MockHistory::new().with_rates(22.0, 20.0);
        let deduction = deduce(&history, 1.5).await.unwrap();
        assert!(deduction.is_none());
    }

    #[tokio::test]
    async fn zero_baseline_is_quiet() {
        let history = MockHistory::new().with_rates(50.0, 0.0);
        let deduction = deduce(&history, 1.5).await.unwrap();
        assert!(deduction.is_none());
    }

    #[tokio::test]
    async fn confidence_caps_for_extreme_ratios() {
        let history = MockHistory::new().with_rates(200.0, 20.0);
        let deduction = deduce(&history, 1.5).await.unwrap().unwrap();
        assert!((deduction.confidence - 0.88).abs() < 1e-9);
    }
}
