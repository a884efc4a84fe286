use serde::{Deserialize, Serialize};

/// Verdict of one shadow plan cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowVerdict {
    /// Every tracked invariant held exactly.
    Verified,
    /// The post-state did not match the predicted delta.
    AnomalyDetected,
    /// The write itself failed; state was not re-read.
    ObservationFailed,
}

/// Aggregate over today's finance entries for one user+category scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceAggregate {
    pub entry_count: u64,
    pub amount_sum: f64,
}

/// Aggregate over open todos for one user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoAggregate {
    pub open_count: u64,
}

/// Aggregate over logged crypto intents for one user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoAggregate {
    pub intent_count: u64,
}

/// Domain-scoped pre/post state snapshot. Links carry no aggregate
/// invariant, so their snapshot is empty by construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum StateSnapshot {
    Finance(FinanceAggregate),
    Todo(TodoAggregate),
    Crypto(CryptoAggregate),
    Link,
}

/// Observed or predicted change between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    pub entry_count: i64,
    pub amount_sum: f64,
}

/// Record of one analyse→plan→execute→observe cycle.
///
/// Created and discarded within a single commit attempt; callers persist
/// only `verdict` and `forensic_note` in the audit trail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShadowPlanResult {
    pub verdict: ShadowVerdict,
    pub pre_state: StateSnapshot,
    /// Absent when the write failed and state was never re-read.
    pub post_state: Option<StateSnapshot>,
    pub expected_delta: StateDelta,
    pub actual_delta: Option<StateDelta>,
    /// Human-readable explanation of what was checked and what held.
    pub forensic_note: String,
    pub execution_time_ms: u64,
}

impl ShadowPlanResult {
    pub fn is_verified(&self) -> bool {
        matches!(self.verdict, ShadowVerdict::Verified)
    }
}
