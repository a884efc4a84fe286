//! Routine detection: a merchant recurring in memory becomes an
//! explicit periodicity pattern in the user profile.

use std::collections::BTreeMap;

use ambient_types::{Deduction, DeductionKind};
use chrono::{DateTime, Utc};

use crate::error::LookupError;
use crate::traits::{HistoryLookup, RoutinePattern};

pub async fn deduce(
    history: &dyn HistoryLookup,
    merchant: &str,
    min_occurrences: usize,
    now: DateTime<Utc>,
) -> Result<Option<Deduction>, LookupError> {
    let mut hits = history.recall("recurring_merchant", merchant).await?;
    hits.retain(|h| h.text.eq_ignore_ascii_case(merchant));
    if hits.len() < min_occurrences {
        return Ok(None);
    }

    hits.sort_by_key(|h| h.recorded_at);
    let intervals: Vec<f64> = hits
        .windows(2)
        .map(|pair| (pair[1].recorded_at - pair[0].recorded_at).num_hours() as f64 / 24.0)
        .collect();
    let period_days = if intervals.is_empty() {
        0.0
    } else {
        intervals.iter().sum::<f64>() / intervals.len() as f64
    };

    let occurrences = hits.len();
    let confidence = (0.65 + 0.04 * occurrences as f64).min(0.92);

    history
        .upsert_routine(RoutinePattern {
            merchant: merchant.to_string(),
            period_days,
            last_seen: now,
            occurrences: occurrences as u32,
        })
        .await?;

    let mut mutations = BTreeMap::new();
    mutations.insert("routine_merchant".to_string(), serde_json::json!(merchant));
    mutations.insert(
        "routine_period_days".to_string(),
        serde_json::json!(period_days),
    );
    mutations.insert("occurrences".to_string(), serde_json::json!(occurrences));

    Ok(Some(Deduction {
        kind: DeductionKind::RoutineDetected,
        confidence,
        summary: format!(
            "{merchant} recurs every {period_days:.1} days ({occurrences} occurrences)"
        ),
        mutations,
        memory_record: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockHistory;
    use crate::traits::MemoryHit;
    use chrono::{Duration, TimeZone};

    fn hit(merchant: &str, days_ago: i64, now: DateTime<Utc>) -> MemoryHit {
        MemoryHit {
            kind: "recurring_merchant".into(),
            text: merchant.into(),
            metadata: BTreeMap::new(),
            recorded_at: now - Duration::days(days_ago),
        }
    }

    #[tokio::test]
    async fn three_occurrences_form_a_routine() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let history = MockHistory::new().with_memories(vec![
            hit("Galp", 30, now),
            hit("Galp", 15, now),
            hit("Galp", 0, now),
        ]);

        let deduction = deduce(&history, "Galp", 3, now)
            .await
            .unwrap()
            .expect("should fire");
        assert_eq!(deduction.kind, DeductionKind::RoutineDetected);
        // 0.65 + 0.04 * 3
        assert!((deduction.confidence - 0.77).abs() < 1e-9);
        assert_eq!(
            deduction.mutations["routine_period_days"],
            serde_json::json!(15.0)
        );

        let routines = history.routines();
        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0].occurrences, 3);
        assert!((routines[0].period_days - 15.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn two_occurrences_are_not_enough() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let history = MockHistory::new()
            .with_memories(vec![hit("Galp", 10, now), hit("Galp", 0, now)]);
        let deduction = deduce(&history, "Galp", 3, now).await.unwrap();
        assert!(deduction.is_none());
        assert!(history.routines().is_empty());
    }

    #[tokio::test]
    async fn other_merchants_are_ignored() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let history = MockHistory::new().with_memories(vec![
            hit("Galp", 20, now),
            hit("Uber", 10, now),
            hit("Galp", 0, now),
        ]);
        let deduction = deduce(&history, "Galp", 3, now).await.unwrap();
        assert!(deduction.is_none());
    }

    #[tokio::test]
    async fn confidence_caps() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let memories = (0..10).map(|i| hit("Lidl", i * 7, now)).collect();
        let history = MockHistory::new().with_memories(memories);
        let deduction = deduce(&history, "Lidl", 3, now).await.unwrap().unwrap();
        assert!((deduction.confidence - 0.92).abs() < 1e-9);
    }
}
