//! Shared data model for the ambient decision pipeline.
//!
//! Every type that crosses a component boundary lives here: the inbound
//! signal, the dispatcher's routing decision, the per-domain drafts, the
//! side-computed deductions, the risk/auto-commit outcome, the shadow
//! plan verification record, and the durable handshake proposal.
//!
//! Types are plain serde-derived data. Behavior lives in the component
//! crates; this crate only carries small derived accessors (missing
//! fields, module mapping, display tags).

pub mod decision;
pub mod deduction;
pub mod draft;
pub mod handshake;
pub mod risk;
pub mod shadow;
pub mod signal;

pub use decision::{ActionModule, DispatcherDecision, ExtractedFields, SignalRoute, Strategy};
pub use deduction::{Deduction, DeductionKind, MemoryRecord};
pub use draft::{
    CryptoAction, CryptoDraft, DueHint, FinanceDraft, LinkDraft, ModuleDraft, TodoDraft,
    TodoPriority,
};
pub use handshake::{HandshakeEvent, HandshakeStatus, NextAction};
pub use risk::{AutoCommitResult, RiskTier};
pub use shadow::{
    CryptoAggregate, FinanceAggregate, ShadowPlanResult, ShadowVerdict, StateDelta, StateSnapshot,
    TodoAggregate,
};
pub use signal::{OcrTrace, RawSignal, SignalKind};
