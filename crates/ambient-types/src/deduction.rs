use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The cross-domain heuristics the deduction engine can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    CalendarCorrelation,
    FinancialPrefill,
    RoutineDetected,
    SpendingVelocity,
}

impl DeductionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeductionKind::CalendarCorrelation => "calendar_correlation",
            DeductionKind::FinancialPrefill => "financial_prefill",
            DeductionKind::RoutineDetected => "routine_detected",
            DeductionKind::SpendingVelocity => "spending_velocity",
        }
    }
}

impl std::fmt::Display for DeductionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A memory record attached to a deduction for best-effort persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Memory kind tag, e.g. `recurring_merchant`.
    pub kind: String,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

/// A confidence-scored inference drawn from historical/contextual data.
///
/// Deductions are attached to a draft but never authoritative on their
/// own: the engine returns suggested `mutations` and the caller decides
/// what to merge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deduction {
    pub kind: DeductionKind,
    /// 0.0..=1.0; deductions below the keep threshold are discarded.
    pub confidence: f64,
    /// Human-readable one-liner for the audit trail.
    pub summary: String,
    /// Suggested context mutations, merged by the caller.
    pub mutations: BTreeMap<String, serde_json::Value>,
    /// Optional memory record to persist alongside.
    pub memory_record: Option<MemoryRecord>,
}
