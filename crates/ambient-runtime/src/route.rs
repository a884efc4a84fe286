//! The decision API result shape returned for every inbound signal.

use ambient_types::{
    AutoCommitResult, Deduction, HandshakeEvent, ModuleDraft, NextAction, ShadowPlanResult,
    SignalRoute, Strategy,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the caller needs to act on one processed signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub signal_id: Uuid,
    pub strategy: Strategy,
    pub route: SignalRoute,
    /// Confidence after deduction adjustments.
    pub confidence: f64,
    pub reason: Vec<String>,
    pub strict_parameters_met: bool,
    /// The resolved draft, absent for unresolved signals.
    pub draft: Option<ModuleDraft>,
    /// Required fields the fallback or the user must still provide.
    pub missing_fields: Vec<String>,
    pub next_action: NextAction,
    /// Kept deductions, strongest first.
    pub deductions: Vec<Deduction>,
    /// Present when an auto-commit was attempted.
    pub commit: Option<AutoCommitResult>,
    /// Present when the commit ran under shadow verification.
    pub shadow: Option<ShadowPlanResult>,
    /// The audit record proposal for this decision.
    pub handshake: HandshakeEvent,
}

impl RouteOutcome {
    pub fn auto_committed(&self) -> bool {
        self.commit.as_ref().is_some_and(|c| c.executed)
    }
}
