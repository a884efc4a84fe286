//! The deduction engine: gates heuristics by module, filters weak
//! results, and persists follow-up memories best-effort.

use std::sync::Arc;

use ambient_types::{Deduction, MemoryRecord, ModuleDraft};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::heuristics::{calendar, prefill, routine, velocity};
use crate::traits::{HistoryLookup, MemorySink};

/// Engine tuning knobs. Keyword tables are data so deployments can
/// localize them without touching heuristic logic.
#[derive(Clone, Debug)]
pub struct DeductionConfig {
    /// Deductions below this confidence are discarded (default: 0.6).
    pub min_confidence: f64,
    /// Calendar correlation window in days (default: 7).
    pub calendar_window_days: i64,
    /// Minimum recalled occurrences for a routine (default: 3).
    pub routine_min_occurrences: usize,
    /// 7-day over 30-day rate ratio that counts as an anomaly (default: 1.5).
    pub velocity_ratio_threshold: f64,
    /// Gift/occasion keywords for calendar correlation.
    pub occasion_keywords: Vec<String>,
    /// Payment-intent verbs for financial prefill.
    pub payment_verbs: Vec<String>,
}

impl Default for DeductionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            calendar_window_days: 7,
            routine_min_occurrences: 3,
            velocity_ratio_threshold: 1.5,
            occasion_keywords: ["presente", "prenda", "aniversario", "anos", "natal", "casamento"]
                .into_iter()
                .map(String::from)
                .collect(),
            payment_verbs: ["pagar", "liquidar", "transferir"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Side-effect-free deduction over a dispatched draft, except for the
/// explicit memory persistence in [`DeductionEngine::persist`].
pub struct DeductionEngine {
    history: Arc<dyn HistoryLookup>,
    memory: Arc<dyn MemorySink>,
    config: DeductionConfig,
}

impl DeductionEngine {
    pub fn new(
        history: Arc<dyn HistoryLookup>,
        memory: Arc<dyn MemorySink>,
        config: DeductionConfig,
    ) -> Self {
        Self {
            history,
            memory,
            config,
        }
    }

    pub fn config(&self) -> &DeductionConfig {
        &self.config
    }

    /// Run every heuristic the draft's module admits, at most once each.
    ///
    /// Lookup failures degrade to "no deduction" (logged, swallowed).
    /// The result keeps only deductions at or above the confidence
    /// threshold, sorted descending.
    pub async fn deduce(
        &self,
        draft: &ModuleDraft,
        raw_text: &str,
        now: DateTime<Utc>,
    ) -> Vec<Deduction> {
        let mut deductions = Vec::new();

        match draft {
            ModuleDraft::Finance(finance) => {
                match calendar::deduce(
                    self.history.as_ref(),
                    raw_text,
                    &self.config.occasion_keywords,
                    self.config.calendar_window_days,
                    now,
                )
                .await
                {
                    Ok(Some(d)) => deductions.push(d),
                    Ok(None) => {}
                    Err(err) => warn!(%err, "calendar correlation degraded to no-op"),
                }

                if let Some(merchant) = finance.merchant.as_deref() {
                    match routine::deduce(
                        self.history.as_ref(),
                        merchant,
                        self.config.routine_min_occurrences,
                        now,
                    )
                    .await
                    {
                        Ok(Some(d)) => deductions.push(d),
                        Ok(None) => {}
                        Err(err) => warn!(%err, merchant, "routine detection degraded to no-op"),
                    }
                }

                match velocity::deduce(
                    self.history.as_ref(),
                    self.config.velocity_ratio_threshold,
                )
                .await
                {
                    Ok(Some(d)) => deductions.push(d),
                    Ok(None) => {}
                    Err(err) => warn!(%err, "spending velocity degraded to no-op"),
                }
            }
            ModuleDraft::Todo(todo) => {
                match prefill::deduce(self.history.as_ref(), &todo.title, &self.config.payment_verbs)
                    .await
                {
                    Ok(Some(d)) => deductions.push(d),
                    Ok(None) => {}
                    Err(err) => warn!(%err, "financial prefill degraded to no-op"),
                }
            }
            ModuleDraft::Crypto(_) | ModuleDraft::Link(_) => {}
        }

        deductions.retain(|d| d.confidence >= self.config.min_confidence);
        deductions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            module = %draft.module(),
            kept = deductions.len(),
            "deduction pass complete"
        );
        deductions
    }

    /// Persist attached memory records, plus the recurring-merchant
    /// observation that feeds future routine detection. Best-effort:
    /// failures are logged and dropped.
    pub async fn persist(&self, draft: &ModuleDraft, deductions: &[Deduction]) {
        for deduction in deductions {
            if let Some(record) = &deduction.memory_record {
                if let Err(err) = self.memory.store(record.clone()).await {
                    warn!(%err, kind = %deduction.kind, "memory store failed, dropped");
                }
            }
        }

        if let ModuleDraft::Finance(finance) = draft {
            if let Some(merchant) = finance.merchant.as_deref() {
                let mut metadata = std::collections::BTreeMap::new();
                if let Some(amount) = finance.amount {
                    metadata.insert("amount".to_string(), format!("{amount:.2}"));
                }
                let record = MemoryRecord {
                    kind: "recurring_merchant".to_string(),
                    text: merchant.to_string(),
                    metadata,
                };
                if let Err(err) = self.memory.store(record).await {
                    warn!(%err, merchant, "merchant observation store failed, dropped");
                }
            }
        }
    }
}
