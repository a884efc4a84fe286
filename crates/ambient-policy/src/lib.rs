//! Risk & auto-commit policy — decides how much autonomy a draft gets.
//!
//! Risk classification is rule-based and exhaustive over the module
//! enum; thresholds rise monotonically with tier and are validated at
//! construction. Auto-commit requires strict parameters AND confidence
//! at or above the tier threshold; execution dispatches to per-domain
//! writers, with the crypto writer logging intents only.

pub mod commit;
pub mod error;
pub mod risk;
pub mod writers;

pub use commit::{AutoCommitDecision, AutoCommitPolicy, CommitExecutor};
pub use error::{PolicyError, WriteError};
pub use risk::{classify_risk, RiskThresholds};
pub use writers::{
    CryptoIntentWriter, FinanceWriter, LinkWriter, TodoWriter, WriteReceipt, WriterSet,
};
