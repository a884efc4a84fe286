//! Orchestrator for the ambient decision pipeline.
//!
//! One inbound signal runs one full cycle — dispatch → deduce →
//! risk/auto-commit → shadow verification — strictly in sequence, and
//! every cycle ends with a handshake proposal for the audit trail.
//!
//! The pipeline holds no mutable state of its own; signals from
//! different users can run concurrently. Per-user ordering is the
//! caller's concern: two signals from the same user may interleave, and
//! the shadow verifier exists precisely to flag the races that result.

pub mod mocks;
pub mod pipeline;
pub mod route;

pub use mocks::InMemoryStore;
pub use pipeline::SignalPipeline;
pub use route::RouteOutcome;
