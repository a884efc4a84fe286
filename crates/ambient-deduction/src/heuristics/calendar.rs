//! Calendar correlation: tie a gift-like purchase to a stored
//! biographical date that falls near "now".

use std::collections::BTreeMap;

use ambient_types::{Deduction, DeductionKind, MemoryRecord};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::LookupError;
use crate::traits::HistoryLookup;

/// Fixed confidence for a calendar hit: the date table is exact, the
/// purchase-to-occasion link is the only uncertain part.
const CALENDAR_CONFIDENCE: f64 = 0.78;

pub async fn deduce(
    history: &dyn HistoryLookup,
    text: &str,
    occasion_keywords: &[String],
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<Option<Deduction>, LookupError> {
    let lowered = text.to_lowercase();
    if !occasion_keywords.iter().any(|k| lowered.contains(k.as_str())) {
        return Ok(None);
    }

    let dates = history.biographical_dates().await?;
    let today = now.date_naive();

    for date in dates {
        if let Some(distance) = days_to_occasion(today, date.month, date.day) {
            if distance <= window_days {
                let mut mutations = BTreeMap::new();
                mutations.insert(
                    "occasion_label".to_string(),
                    serde_json::json!(date.label.clone()),
                );
                mutations.insert(
                    "occasion_date".to_string(),
                    serde_json::json!(format!("{:02}-{:02}", date.month, date.day)),
                );
                mutations.insert("occasion_kind".to_string(), serde_json::json!(date.kind));

                let summary = format!(
                    "purchase correlates with '{}' ({:02}-{:02}, {} days away)",
                    date.label, date.month, date.day, distance
                );

                let mut metadata = BTreeMap::new();
                metadata.insert("occasion_label".to_string(), date.label.clone());
                metadata.insert("distance_days".to_string(), distance.to_string());

                return Ok(Some(Deduction {
                    kind: DeductionKind::CalendarCorrelation,
                    confidence: CALENDAR_CONFIDENCE,
                    summary,
                    mutations,
                    memory_record: Some(MemoryRecord {
                        kind: "occasion_purchase".to_string(),
                        text: format!("gift purchase near {}", date.label),
                        metadata,
                    }),
                }));
            }
        }
    }

    Ok(None)
}

/// Year-agnostic distance in days from `today` to the month/day
/// occasion, checking the adjacent years so late-December birthdays
/// match early-January purchases. Invalid dates (Feb 29 off leap years)
/// resolve against the years where they exist.
fn days_to_occasion(today: NaiveDate, month: u32, day: u32) -> Option<i64> {
    let mut best: Option<i64> = None;
    for year in [today.year() - 1, today.year(), today.year() + 1] {
        if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
            let distance = (candidate - today).num_days().abs();
            best = Some(best.map_or(distance, |b: i64| b.min(distance)));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DeductionConfig;
    use crate::mocks::MockHistory;
    use crate::traits::BiographicalDate;
    use chrono::{Duration, TimeZone};

    fn keywords() -> Vec<String> {
        DeductionConfig::default().occasion_keywords
    }

    #[tokio::test]
    async fn gift_keyword_near_birthday_fires() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let soon = now + Duration::days(3);
        let history = MockHistory::new().with_dates(vec![BiographicalDate {
            label: "aniversario da mae".into(),
            month: soon.month(),
            day: soon.day(),
            kind: "birthday".into(),
        }]);

        let deduction = deduce(&history, "comprei um presente 30 eur", &keywords(), 7, now)
            .await
            .unwrap()
            .expect("should fire");
        assert_eq!(deduction.kind, DeductionKind::CalendarCorrelation);
        assert!((deduction.confidence - 0.78).abs() < 1e-9);
        assert!(deduction.memory_record.is_some());
        assert_eq!(
            deduction.mutations["occasion_label"],
            serde_json::json!("aniversario da mae")
        );
    }

    #[tokio::test]
    async fn far_date_does_not_fire() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let history = MockHistory::new().with_dates(vec![BiographicalDate {
            label: "natal".into(),
            month: 12,
            day: 25,
            kind: "holiday".into(),
        }]);

        let deduction = deduce(&history, "comprei um presente", &keywords(), 7, now)
            .await
            .unwrap();
        assert!(deduction.is_none());
    }

    #[tokio::test]
    async fn no_gift_keyword_skips_lookup() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let history = MockHistory::new();
        let deduction = deduce(&history, "fatura continente 45,90", &keywords(), 7, now)
            .await
            .unwrap();
        assert!(deduction.is_none());
    }

    #[test]
    fn year_boundary_wraps() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        // Jan 2 of next year is 3 days away, not ~360.
        assert_eq!(days_to_occasion(today, 1, 2), Some(3));
    }
}
