//! Narrow read/write interfaces into externally-owned state.
//!
//! The engine never talks to a database or vector store directly; the
//! hosting process injects implementations of these traits with
//! whatever timeout/isolation policy it wants.

use std::collections::BTreeMap;

use ambient_types::MemoryRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A stored biographical date — year-agnostic (birthday, anniversary).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiographicalDate {
    pub label: String,
    pub month: u32,
    pub day: u32,
    /// Date type tag, e.g. `birthday` or `anniversary`.
    pub kind: String,
}

/// A prior financial record surfaced by history search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub merchant: String,
    pub description: String,
    pub amount: f64,
    pub occurred_at: DateTime<Utc>,
}

/// A recalled memory with its kind tag and metadata bag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryHit {
    pub kind: String,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
    pub recorded_at: DateTime<Utc>,
}

/// Routine pattern upserted into user profile state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutinePattern {
    pub merchant: String,
    /// Mean interval between occurrences, in days.
    pub period_days: f64,
    pub last_seen: DateTime<Utc>,
    pub occurrences: u32,
}

/// Point reads of aggregates and profile fields plus similarity recall.
#[async_trait]
pub trait HistoryLookup: Send + Sync {
    /// All stored biographical dates for the user.
    async fn biographical_dates(&self) -> Result<Vec<BiographicalDate>, LookupError>;

    /// Historical financial records whose merchant/description match.
    async fn financial_matches(&self, query: &str) -> Result<Vec<FinancialRecord>, LookupError>;

    /// Similarity recall over stored memories, filtered by kind.
    async fn recall(&self, kind: &str, query: &str) -> Result<Vec<MemoryHit>, LookupError>;

    /// Mean daily expense/bill rate over the trailing window.
    async fn daily_expense_rate(&self, window_days: u32) -> Result<f64, LookupError>;

    /// Upsert a routine pattern into profile state.
    async fn upsert_routine(&self, pattern: RoutinePattern) -> Result<(), LookupError>;
}

/// Fire-and-forget memory persistence. Best-effort: the pipeline keeps
/// going when a store fails.
#[async_trait]
pub trait MemorySink: Send + Sync {
    async fn store(&self, record: MemoryRecord) -> Result<(), LookupError>;
}
