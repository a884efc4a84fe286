//! In-memory lookup/sink implementations for tests and local runs.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use ambient_types::MemoryRecord;
use async_trait::async_trait;

use crate::error::LookupError;
use crate::traits::{
    BiographicalDate, FinancialRecord, HistoryLookup, MemoryHit, MemorySink, RoutinePattern,
};

/// Mock history with fixture data, builder-style.
#[derive(Default)]
pub struct MockHistory {
    dates: Vec<BiographicalDate>,
    records: Vec<FinancialRecord>,
    memories: Vec<MemoryHit>,
    rate_7d: f64,
    rate_30d: f64,
    routines: Mutex<Vec<RoutinePattern>>,
    fail: bool,
}

impl MockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails, for exercising the best-effort paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, dates: Vec<BiographicalDate>) -> Self {
        self.dates = dates;
        self
    }

    pub fn with_records(mut self, records: Vec<FinancialRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_memories(mut self, memories: Vec<MemoryHit>) -> Self {
        self.memories = memories;
        self
    }

    pub fn with_rates(mut self, rate_7d: f64, rate_30d: f64) -> Self {
        self.rate_7d = rate_7d;
        self.rate_30d = rate_30d;
        self
    }

    /// Routine patterns upserted so far.
    pub fn routines(&self) -> Vec<RoutinePattern> {
        self.routines.lock().expect("mock lock poisoned").clone()
    }

    fn guard(&self) -> Result<(), LookupError> {
        if self.fail {
            Err(LookupError::Lookup("mock history failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HistoryLookup for MockHistory {
    async fn biographical_dates(&self) -> Result<Vec<BiographicalDate>, LookupError> {
        self.guard()?;
        Ok(self.dates.clone())
    }

    async fn financial_matches(&self, query: &str) -> Result<Vec<FinancialRecord>, LookupError> {
        self.guard()?;
        // Token-level match, the shape a real text search would give.
        let tokens: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .filter(|t| t.len() >= 4)
            .map(String::from)
            .collect();
        Ok(self
            .records
            .iter()
            .filter(|r| {
                let haystack =
                    format!("{} {}", r.merchant.to_lowercase(), r.description.to_lowercase());
                tokens.iter().any(|t| haystack.contains(t.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn recall(&self, kind: &str, query: &str) -> Result<Vec<MemoryHit>, LookupError> {
        self.guard()?;
        let lowered = query.to_lowercase();
        Ok(self
            .memories
            .iter()
            .filter(|m| m.kind == kind && m.text.to_lowercase().contains(&lowered))
            .cloned()
            .collect())
    }

    async fn daily_expense_rate(&self, window_days: u32) -> Result<f64, LookupError> {
        self.guard()?;
        Ok(match window_days {
            7 => self.rate_7d,
            _ => self.rate_30d,
        })
    }

    async fn upsert_routine(&self, pattern: RoutinePattern) -> Result<(), LookupError> {
        self.guard()?;
        let mut routines = self.routines.lock().expect("mock lock poisoned");
        if let Some(existing) = routines.iter_mut().find(|r| r.merchant == pattern.merchant) {
            *existing = pattern;
        } else {
            routines.push(pattern);
        }
        Ok(())
    }
}

/// Mock memory sink recording every store.
pub struct MockMemorySink {
    stored: Arc<Mutex<Vec<MemoryRecord>>>,
    fail: bool,
}

impl MockMemorySink {
    pub fn new() -> Self {
        Self {
            stored: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            stored: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Shared handle onto the stored records, for assertions after the
    /// sink moves into the engine.
    pub fn handle(&self) -> Arc<Mutex<Vec<MemoryRecord>>> {
        Arc::clone(&self.stored)
    }

    pub fn stored(&self) -> Vec<MemoryRecord> {
        self.stored.lock().expect("mock lock poisoned").clone()
    }
}

impl Default for MockMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemorySink for MockMemorySink {
    async fn store(&self, record: MemoryRecord) -> Result<(), LookupError> {
        if self.fail {
            return Err(LookupError::Store("mock sink failure".into()));
        }
        self.stored.lock().expect("mock lock poisoned").push(record);
        Ok(())
    }
}

/// Convenience metadata builder for fixtures.
pub fn metadata(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
