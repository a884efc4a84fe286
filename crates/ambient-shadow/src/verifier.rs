//! The analyse→plan→execute→observe cycle, per domain.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use ambient_types::{
    AutoCommitResult, ShadowPlanResult, ShadowVerdict, StateDelta, StateSnapshot,
};
use tracing::{debug, warn};

use crate::observer::{AggregateReader, FinanceScope};

/// Verifier tuning.
#[derive(Clone, Copy, Debug)]
pub struct VerifierConfig {
    /// Allowed absolute drift on amount sums (default: 0.01), covering
    /// decimal storage rounding.
    pub amount_tolerance: f64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: 0.01,
        }
    }
}

/// Wraps autonomous writes in snapshot verification. Never retries,
/// never rolls back; anomalies are reported for the audit trail.
pub struct ShadowVerifier {
    reader: Arc<dyn AggregateReader>,
    config: VerifierConfig,
}

impl ShadowVerifier {
    pub fn new(reader: Arc<dyn AggregateReader>, config: VerifierConfig) -> Self {
        Self { reader, config }
    }

    /// Finance cycle: entry count must advance by exactly one and the
    /// amount sum by the committed amount (within tolerance).
    pub async fn verify_finance<F, Fut>(
        &self,
        scope: &FinanceScope,
        amount: f64,
        commit: F,
    ) -> (AutoCommitResult, ShadowPlanResult)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AutoCommitResult>,
    {
        let started = Instant::now();
        let expected = StateDelta {
            entry_count: 1,
            amount_sum: amount,
        };

        // ANALYSE
        let pre = match self.reader.finance_aggregate(scope).await {
            Ok(agg) => agg,
            Err(err) => {
                warn!(%err, "finance pre-state read failed");
                let commit_result = commit().await;
                let shadow = unobserved(
                    StateSnapshot::Finance(Default::default()),
                    expected,
                    format!("pre-state read failed: {err}; write proceeded unverified"),
                    started,
                );
                return (commit_result, shadow);
            }
        };

        // EXECUTE
        let commit_result = commit().await;
        if !commit_result.executed {
            let shadow = unobserved(
                StateSnapshot::Finance(pre),
                expected,
                format!("write not executed: {}", commit_result.reason),
                started,
            );
            return (commit_result, shadow);
        }

        // OBSERVE
        let post = match self.reader.finance_aggregate(scope).await {
            Ok(agg) => agg,
            Err(err) => {
                let shadow = unobserved(
                    StateSnapshot::Finance(pre),
                    expected,
                    format!("post-state read failed: {err}"),
                    started,
                );
                return (commit_result, shadow);
            }
        };

        let actual = StateDelta {
            entry_count: post.entry_count as i64 - pre.entry_count as i64,
            amount_sum: post.amount_sum - pre.amount_sum,
        };

        let mut violations = Vec::new();
        if actual.entry_count != 1 {
            violations.push(format!(
                "entry-count delta {} != 1 (possible concurrent write or failed insert)",
                actual.entry_count
            ));
        }
        if (actual.amount_sum - amount).abs() > self.config.amount_tolerance {
            violations.push(format!(
                "amount delta {:.2} != committed {:.2} (possible cascading trigger or floating-point drift)",
                actual.amount_sum, amount
            ));
        }

        let shadow = conclude(
            StateSnapshot::Finance(pre),
            StateSnapshot::Finance(post),
            expected,
            actual,
            violations,
            started,
        );
        (commit_result, shadow)
    }

    /// Todo cycle: open-count must advance by exactly one.
    pub async fn verify_todo<F, Fut>(&self, commit: F) -> (AutoCommitResult, ShadowPlanResult)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AutoCommitResult>,
    {
        let started = Instant::now();
        let expected = StateDelta {
            entry_count: 1,
            amount_sum: 0.0,
        };

        let pre = match self.reader.todo_aggregate().await {
            Ok(agg) => agg,
            Err(err) => {
                warn!(%err, "todo pre-state read failed");
                let commit_result = commit().await;
                let shadow = unobserved(
                    StateSnapshot::Todo(Default::default()),
                    expected,
                    format!("pre-state read failed: {err}; write proceeded unverified"),
                    started,
                );
                return (commit_result, shadow);
            }
        };

        let commit_result = commit().await;
        if !commit_result.executed {
            let shadow = unobserved(
                StateSnapshot::Todo(pre),
                expected,
                format!("write not executed: {}", commit_result.reason),
                started,
            );
            return (commit_result, shadow);
        }

        let post = match self.reader.todo_aggregate().await {
            Ok(agg) => agg,
            Err(err) => {
                let shadow = unobserved(
                    StateSnapshot::Todo(pre),
                    expected,
                    format!("post-state read failed: {err}"),
                    started,
                );
                return (commit_result, shadow);
            }
        };

        let actual = StateDelta {
            entry_count: post.open_count as i64 - pre.open_count as i64,
            amount_sum: 0.0,
        };

        let mut violations = Vec::new();
        if actual.entry_count != 1 {
            violations.push(format!(
                "open-todo delta {} != 1 (possible concurrent write)",
                actual.entry_count
            ));
        }

        let shadow = conclude(
            StateSnapshot::Todo(pre),
            StateSnapshot::Todo(post),
            expected,
            actual,
            violations,
            started,
        );
        (commit_result, shadow)
    }

    /// Crypto cycle: the intent log is a countable aggregate, so it
    /// gets the same count-delta check as todos.
    pub async fn verify_crypto<F, Fut>(&self, commit: F) -> (AutoCommitResult, ShadowPlanResult)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AutoCommitResult>,
    {
        let started = Instant::now();
        let expected = StateDelta {
            entry_count: 1,
            amount_sum: 0.0,
        };

        let pre = match self.reader.crypto_aggregate().await {
            Ok(agg) => agg,
            Err(err) => {
                warn!(%err, "crypto pre-state read failed");
                let commit_result = commit().await;
                let shadow = unobserved(
                    StateSnapshot::Crypto(Default::default()),
                    expected,
                    format!("pre-state read failed: {err}; write proceeded unverified"),
                    started,
                );
                return (commit_result, shadow);
            }
        };

        let commit_result = commit().await;
        if !commit_result.executed {
            let shadow = unobserved(
                StateSnapshot::Crypto(pre),
                expected,
                format!("write not executed: {}", commit_result.reason),
                started,
            );
            return (commit_result, shadow);
        }

        let post = match self.reader.crypto_aggregate().await {
            Ok(agg) => agg,
            Err(err) => {
                let shadow = unobserved(
                    StateSnapshot::Crypto(pre),
                    expected,
                    format!("post-state read failed: {err}"),
                    started,
                );
                return (commit_result, shadow);
            }
        };

        let actual = StateDelta {
            entry_count: post.intent_count as i64 - pre.intent_count as i64,
            amount_sum: 0.0,
        };

        let mut violations = Vec::new();
        if actual.entry_count != 1 {
            violations.push(format!(
                "intent-count delta {} != 1 (possible concurrent write)",
                actual.entry_count
            ));
        }

        let shadow = conclude(
            StateSnapshot::Crypto(pre),
            StateSnapshot::Crypto(post),
            expected,
            actual,
            violations,
            started,
        );
        (commit_result, shadow)
    }

    /// Link cycle: links carry no aggregate invariant, so verification
    /// only checks that the write succeeded.
    pub async fn verify_link<F, Fut>(&self, commit: F) -> (AutoCommitResult, ShadowPlanResult)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AutoCommitResult>,
    {
        let started = Instant::now();
        let commit_result = commit().await;

        let shadow = if commit_result.executed {
            ShadowPlanResult {
                verdict: ShadowVerdict::Verified,
                pre_state: StateSnapshot::Link,
                post_state: Some(StateSnapshot::Link),
                expected_delta: StateDelta::default(),
                actual_delta: Some(StateDelta::default()),
                forensic_note: "link write receipt confirmed; no aggregate invariant to diff"
                    .into(),
                execution_time_ms: elapsed_ms(started),
            }
        } else {
            unobserved(
                StateSnapshot::Link,
                StateDelta::default(),
                format!("write not executed: {}", commit_result.reason),
                started,
            )
        };
        (commit_result, shadow)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn unobserved(
    pre_state: StateSnapshot,
    expected: StateDelta,
    forensic_note: String,
    started: Instant,
) -> ShadowPlanResult {
    ShadowPlanResult {
        verdict: ShadowVerdict::ObservationFailed,
        pre_state,
        post_state: None,
        expected_delta: expected,
        actual_delta: None,
        forensic_note,
        execution_time_ms: elapsed_ms(started),
    }
}

fn conclude(
    pre_state: StateSnapshot,
    post_state: StateSnapshot,
    expected: StateDelta,
    actual: StateDelta,
    violations: Vec<String>,
    started: Instant,
) -> ShadowPlanResult {
    let (verdict, forensic_note) = if violations.is_empty() {
        (
            ShadowVerdict::Verified,
            "all tracked invariants held exactly".to_string(),
        )
    } else {
        (ShadowVerdict::AnomalyDetected, violations.join("; "))
    };

    if verdict == ShadowVerdict::AnomalyDetected {
        warn!(note = %forensic_note, "shadow plan anomaly");
    } else {
        debug!("shadow plan verified");
    }

    ShadowPlanResult {
        verdict,
        pre_state,
        post_state: Some(post_state),
        expected_delta: expected,
        actual_delta: Some(actual),
        forensic_note,
        execution_time_ms: elapsed_ms(started),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserveError;
    use crate::observer::AggregateReader;
    use ambient_types::{
        ActionModule, CryptoAggregate, FinanceAggregate, RiskTier, TodoAggregate,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Mock store whose aggregates the test mutates around the commit.
    #[derive(Default)]
    struct MockStore {
        finance: Mutex<FinanceAggregate>,
        todos: Mutex<TodoAggregate>,
        intents: Mutex<CryptoAggregate>,
        fail_reads: Mutex<bool>,
    }

    impl MockStore {
        fn apply_finance(&self, count: i64, amount: f64) {
            let mut agg = self.finance.lock().unwrap();
            agg.entry_count = (agg.entry_count as i64 + count) as u64;
            agg.amount_sum += amount;
        }

        fn apply_todo(&self, count: i64) {
            let mut agg = self.todos.lock().unwrap();
            agg.open_count = (agg.open_count as i64 + count) as u64;
        }

        fn apply_intent(&self, count: i64) {
            let mut agg = self.intents.lock().unwrap();
            agg.intent_count = (agg.intent_count as i64 + count) as u64;
        }
    }

    #[async_trait]
    impl AggregateReader for MockStore {
        async fn finance_aggregate(
            &self,
            _scope: &FinanceScope,
        ) -> Result<FinanceAggregate, ObserveError> {
            if *self.fail_reads.lock().unwrap() {
                return Err(ObserveError::Read("store offline".into()));
            }
            Ok(*self.finance.lock().unwrap())
        }

        async fn todo_aggregate(&self) -> Result<TodoAggregate, ObserveError> {
            if *self.fail_reads.lock().unwrap() {
                return Err(ObserveError::Read("store offline".into()));
            }
            Ok(*self.todos.lock().unwrap())
        }

        async fn crypto_aggregate(&self) -> Result<CryptoAggregate, ObserveError> {
            if *self.fail_reads.lock().unwrap() {
                return Err(ObserveError::Read("store offline".into()));
            }
            Ok(*self.intents.lock().unwrap())
        }
    }

    fn commit_result(module: ActionModule, executed: bool) -> AutoCommitResult {
        AutoCommitResult {
            executed,
            module,
            risk_tier: RiskTier::Low,
            dynamic_threshold: 0.88,
            confidence: 0.9,
            external_id: executed.then(|| "ext-1".to_string()),
            reason: if executed { "committed" } else { "boom" }.into(),
        }
    }

    fn scope() -> FinanceScope {
        FinanceScope {
            day: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            category: Some("Supermercado".into()),
        }
    }

    fn verifier(store: &Arc<MockStore>) -> ShadowVerifier {
        ShadowVerifier::new(store.clone() as Arc<dyn AggregateReader>, VerifierConfig::default())
    }

    #[tokio::test]
    async fn clean_finance_commit_verifies() {
        let store = Arc::new(MockStore::default());
        store.apply_finance(3, 100.0);
        let verifier = verifier(&store);

        let (result, shadow) = verifier
            .verify_finance(&scope(), 12.0, || async {
                store.apply_finance(1, 12.0);
                commit_result(ActionModule::Finance, true)
            })
            .await;

        assert!(result.executed);
        assert_eq!(shadow.verdict, ShadowVerdict::Verified);
        assert_eq!(shadow.actual_delta.unwrap().entry_count, 1);
        assert!((shadow.actual_delta.unwrap().amount_sum - 12.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn concurrent_write_is_flagged_not_retried() {
        let store = Arc::new(MockStore::default());
        let verifier = verifier(&store);

        let (result, shadow) = verifier
            .verify_finance(&scope(), 12.0, || async {
                // The commit plus an interleaved write from elsewhere.
                store.apply_finance(2, 24.0);
                commit_result(ActionModule::Finance, true)
            })
            .await;

        assert!(result.executed, "the write itself is not rolled back");
        assert_eq!(shadow.verdict, ShadowVerdict::AnomalyDetected);
        assert!(shadow.forensic_note.contains("entry-count delta 2"));
        assert!(shadow.forensic_note.contains("concurrent write"));
    }

    #[tokio::test]
    async fn amount_drift_beyond_tolerance_is_anomalous() {
        let store = Arc::new(MockStore::default());
        let verifier = verifier(&store);

        let (_, shadow) = verifier
            .verify_finance(&scope(), 12.0, || async {
                store.apply_finance(1, 12.5);
                commit_result(ActionModule::Finance, true)
            })
            .await;

        assert_eq!(shadow.verdict, ShadowVerdict::AnomalyDetected);
        assert!(shadow.forensic_note.contains("amount delta"));
    }

    #[tokio::test]
    async fn sub_cent_drift_is_tolerated() {
        let store = Arc::new(MockStore::default());
        let verifier = verifier(&store);

        let (_, shadow) = verifier
            .verify_finance(&scope(), 12.0, || async {
                store.apply_finance(1, 12.004);
                commit_result(ActionModule::Finance, true)
            })
            .await;

        assert_eq!(shadow.verdict, ShadowVerdict::Verified);
    }

    #[tokio::test]
    async fn failed_write_short_circuits_observation() {
        let store = Arc::new(MockStore::default());
        let verifier = verifier(&store);

        let (result, shadow) = verifier
            .verify_finance(&scope(), 12.0, || async {
                commit_result(ActionModule::Finance, false)
            })
            .await;

        assert!(!result.executed);
        assert_eq!(shadow.verdict, ShadowVerdict::ObservationFailed);
        assert!(shadow.post_state.is_none());
        assert!(shadow.forensic_note.contains("write not executed"));
    }

    #[tokio::test]
    async fn analyse_is_idempotent_without_writes() {
        let store = Arc::new(MockStore::default());
        store.apply_finance(5, 77.7);
        let first = store.finance_aggregate(&scope()).await.unwrap();
        let second = store.finance_aggregate(&scope()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn todo_count_invariant() {
        let store = Arc::new(MockStore::default());
        store.apply_todo(4);
        let verifier = verifier(&store);

        let (_, shadow) = verifier
            .verify_todo(|| async {
                store.apply_todo(1);
                commit_result(ActionModule::Todo, true)
            })
            .await;
        assert_eq!(shadow.verdict, ShadowVerdict::Verified);

        let (_, shadow) = verifier
            .verify_todo(|| async {
                // Nothing actually landed.
                commit_result(ActionModule::Todo, true)
            })
            .await;
        assert_eq!(shadow.verdict, ShadowVerdict::AnomalyDetected);
    }

    #[tokio::test]
    async fn crypto_intent_count_invariant() {
        let store = Arc::new(MockStore::default());
        let verifier = verifier(&store);

        let (_, shadow) = verifier
            .verify_crypto(|| async {
                store.apply_intent(1);
                commit_result(ActionModule::Crypto, true)
            })
            .await;
        assert_eq!(shadow.verdict, ShadowVerdict::Verified);
    }

    #[tokio::test]
    async fn link_verification_is_receipt_only() {
        let store = Arc::new(MockStore::default());
        let verifier = verifier(&store);

        let (_, shadow) = verifier
            .verify_link(|| async { commit_result(ActionModule::Links, true) })
            .await;
        assert_eq!(shadow.verdict, ShadowVerdict::Verified);
        assert_eq!(shadow.pre_state, StateSnapshot::Link);

        let (_, shadow) = verifier
            .verify_link(|| async { commit_result(ActionModule::Links, false) })
            .await;
        assert_eq!(shadow.verdict, ShadowVerdict::ObservationFailed);
    }

    #[tokio::test]
    async fn pre_read_failure_still_commits_once() {
        let store = Arc::new(MockStore::default());
        *store.fail_reads.lock().unwrap() = true;
        let verifier = verifier(&store);

        let committed = Arc::new(Mutex::new(0));
        let committed_clone = committed.clone();
        let (result, shadow) = verifier
            .verify_finance(&scope(), 12.0, || async move {
                *committed_clone.lock().unwrap() += 1;
                commit_result(ActionModule::Finance, true)
            })
            .await;

        assert!(result.executed);
        assert_eq!(*committed.lock().unwrap(), 1);
        assert_eq!(shadow.verdict, ShadowVerdict::ObservationFailed);
        assert!(shadow.forensic_note.contains("pre-state read failed"));
    }
}
