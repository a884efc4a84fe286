//! Deduction engine — independent cross-domain heuristics that enrich a
//! dispatched draft with historical and calendar context.
//!
//! Each heuristic is domain-gated and fires at most once per signal:
//! calendar correlation and routine/velocity analysis for finance
//! drafts, financial prefill for todos. Heuristics read through the
//! narrow [`HistoryLookup`] interface and never mutate the draft —
//! they return suggested mutations the caller merges.
//!
//! Lookup and memory-store failures are logged and degrade to "no
//! deduction"; they never propagate past this crate.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod mocks;
pub mod traits;

pub use engine::{DeductionConfig, DeductionEngine};
pub use error::LookupError;
pub use mocks::{MockHistory, MockMemorySink};
pub use traits::{
    BiographicalDate, FinancialRecord, HistoryLookup, MemoryHit, MemorySink, RoutinePattern,
};
