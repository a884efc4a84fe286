//! Financial prefill: when a todo is a payment intent, suggest the
//! historical mean amount for the payee.

use std::collections::BTreeMap;

use ambient_types::{Deduction, DeductionKind};

use crate::error::LookupError;
use crate::traits::HistoryLookup;

pub async fn deduce(
    history: &dyn HistoryLookup,
    todo_title: &str,
    payment_verbs: &[String],
) -> Result<Option<Deduction>, LookupError> {
    let lowered = todo_title.to_lowercase();
    let verb = match payment_verbs
        .iter()
        .find(|v| lowered.split_whitespace().any(|w| w == v.as_str()))
    {
        Some(v) => v,
        None => return Ok(None),
    };

    // Strip the verb and connectives; what remains names the payee.
    let query: String = lowered
        .split_whitespace()
        .filter(|w| *w != verb.as_str() && !matches!(*w, "o" | "a" | "os" | "as" | "de" | "do" | "da"))
        .collect::<Vec<_>>()
        .join(" ");
    if query.trim().is_empty() {
        return Ok(None);
    }

    let matches = history.financial_matches(&query).await?;
    if matches.is_empty() {
        return Ok(None);
    }

    let mean = matches.iter().map(|r| r.amount).sum::<f64>() / matches.len() as f64;
    let confidence = (0.6 + 0.05 * matches.len() as f64).min(0.90);

    let mut mutations = BTreeMap::new();
    mutations.insert("suggested_amount".to_string(), serde_json::json!(mean));
    mutations.insert(
        "matched_records".to_string(),
        serde_json::json!(matches.len()),
    );

    Ok(Some(Deduction {
        kind: DeductionKind::FinancialPrefill,
        confidence,
        summary: format!(
            "{} historical matches for '{}', mean {:.2}",
            matches.len(),
            query,
            mean
        ),
        mutations,
        memory_record: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DeductionConfig;
    use crate::mocks::MockHistory;
    use crate::traits::FinancialRecord;
    use chrono::Utc;

    fn verbs() -> Vec<String> {
        DeductionConfig::default().payment_verbs
    }

    fn record(amount: f64) -> FinancialRecord {
        FinancialRecord {
            merchant: "Seguradora".into(),
            description: "seguro da carrinha".into(),
            amount,
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn payment_todo_gets_mean_suggestion() {
        let history =
            MockHistory::new().with_records(vec![record(80.0), record(90.0), record(100.0)]);
        let deduction = deduce(&history, "pagar o seguro da carrinha", &verbs())
            .await
            .unwrap()
            .expect("should fire");
        assert_eq!(deduction.kind, DeductionKind::FinancialPrefill);
        // 0.6 + 0.05 * 3
        assert!((deduction.confidence - 0.75).abs() < 1e-9);
        assert_eq!(
            deduction.mutations["suggested_amount"],
            serde_json::json!(90.0)
        );
    }

    #[tokio::test]
    async fn confidence_caps_at_ninety_percent() {
        let records = (0..10).map(|_| record(50.0)).collect();
        let history = MockHistory::new().with_records(records);
        let deduction = deduce(&history, "pagar o seguro", &verbs())
            .await
            .unwrap()
            .unwrap();
        assert!((deduction.confidence - 0.90).abs() < 1e-9);
    }

    #[tokio::test]
    async fn non_payment_todo_is_skipped() {
        let history = MockHistory::new().with_records(vec![record(10.0)]);
        let deduction = deduce(&history, "marcar consulta", &verbs()).await.unwrap();
        assert!(deduction.is_none());
    }

    #[tokio::test]
    async fn no_matches_no_deduction() {
        let history = MockHistory::new();
        let deduction = deduce(&history, "pagar o seguro", &verbs()).await.unwrap();
        assert!(deduction.is_none());
    }

    #[tokio::test]
    async fn bare_verb_is_skipped() {
        let history = MockHistory::new().with_records(vec![record(10.0)]);
        let deduction = deduce(&history, "pagar", &verbs()).await.unwrap();
        assert!(deduction.is_none());
    }
}
