//! Reflex dispatcher — the local, rule-based classification path.
//!
//! Four independent domain matchers run against the normalized signal
//! text, each producing a partial extraction and a local confidence.
//! The highest-scoring matcher wins; below the confidence floor the
//! signal resolves to `Unresolved` and is escalated to the fallback.
//!
//! Everything in this crate is a pure function of the signal plus the
//! lexicon tables: no I/O, no clock, no errors. An empty or garbled
//! signal yields the unresolved sentinel, never a panic.

pub mod amount;
pub mod dispatcher;
pub mod lexicon;
pub mod matchers;

pub use dispatcher::{build_draft, DispatcherConfig, ReflexDispatcher};
pub use lexicon::{Lexicon, MerchantEntry};
