//! The full decision cycle for one inbound signal.

use ambient_deduction::DeductionEngine;
use ambient_dispatch::{build_draft, ReflexDispatcher};
use ambient_policy::{AutoCommitDecision, AutoCommitPolicy, CommitExecutor};
use ambient_shadow::{FinanceScope, ShadowVerifier};
use ambient_types::{
    AutoCommitResult, Deduction, DeductionKind, DispatcherDecision, HandshakeEvent,
    HandshakeStatus, ModuleDraft, NextAction, RawSignal, ShadowPlanResult, SignalRoute,
};
use chrono::Utc;
use tracing::info;

use crate::route::RouteOutcome;

/// Sequences dispatch → deduction → risk/auto-commit → verification.
///
/// Holds only immutable components; every call to [`process`] is an
/// independent cycle over its own signal.
///
/// [`process`]: SignalPipeline::process
pub struct SignalPipeline {
    dispatcher: ReflexDispatcher,
    deduction: DeductionEngine,
    policy: AutoCommitPolicy,
    executor: CommitExecutor,
    verifier: ShadowVerifier,
}

impl SignalPipeline {
    pub fn new(
        dispatcher: ReflexDispatcher,
        deduction: DeductionEngine,
        policy: AutoCommitPolicy,
        executor: CommitExecutor,
        verifier: ShadowVerifier,
    ) -> Self {
        Self {
            dispatcher,
            deduction,
            policy,
            executor,
            verifier,
        }
    }

    /// Run one full decision cycle. Never errors: every failure mode
    /// degrades to "do not auto-commit" and is explained in the outcome.
    pub async fn process(&self, signal: RawSignal) -> RouteOutcome {
        let decision = self.dispatcher.evaluate(&signal);

        let draft = match build_draft(&signal, &decision) {
            Some(draft) => draft,
            None => return self.unresolved_outcome(&signal, decision),
        };

        let now = Utc::now();
        let deductions = self.deduction.deduce(&draft, &signal.raw_text, now).await;
        self.deduction.persist(&draft, &deductions).await;

        let (confidence, mut reason) =
            merge_deductions(decision.confidence, decision.reason.clone(), &deductions);

        let commit_decision = self
            .policy
            .decide(&draft, confidence, decision.strict_parameters_met);
        reason.push(format!("risk_tier={}", commit_decision.risk_tier));
        reason.push(format!(
            "dynamic_threshold={:.2}",
            commit_decision.dynamic_threshold
        ));

        let (commit, shadow) = if commit_decision.auto_commit {
            self.commit_verified(&draft, &commit_decision, confidence, now)
                .await
        } else {
            (None, None)
        };

        let module = draft.module();
        let (status, next_action) = match &commit {
            Some(result) if result.executed => {
                (HandshakeStatus::AutoCommitted, NextAction::AutoCommitted)
            }
            Some(_) => (HandshakeStatus::Failed, NextAction::handshake_for(module)),
            None if decision.strict_parameters_met => (
                HandshakeStatus::PendingConfirmation,
                NextAction::handshake_for(module),
            ),
            None => (
                HandshakeStatus::PendingConfirmation,
                NextAction::AmbientClarification,
            ),
        };

        let payload = handshake_payload(
            &commit_decision,
            confidence,
            &decision,
            &deductions,
            shadow.as_ref(),
        );
        let handshake = HandshakeEvent::new(signal.signal_id, Some(module), status, payload);

        info!(
            signal_id = %signal.signal_id,
            route = %decision.route,
            status = status_tag(&status),
            ?next_action,
            "decision cycle complete"
        );

        RouteOutcome {
            signal_id: signal.signal_id,
            strategy: decision.strategy,
            route: decision.route,
            confidence,
            reason,
            strict_parameters_met: decision.strict_parameters_met,
            missing_fields: draft
                .missing_fields()
                .into_iter()
                .map(String::from)
                .collect(),
            draft: Some(draft),
            next_action,
            deductions,
            commit,
            shadow,
            handshake,
        }
    }

    async fn commit_verified(
        &self,
        draft: &ModuleDraft,
        commit_decision: &AutoCommitDecision,
        confidence: f64,
        now: chrono::DateTime<Utc>,
    ) -> (Option<AutoCommitResult>, Option<ShadowPlanResult>) {
        let commit = || async { self.executor.execute(draft, commit_decision, confidence).await };

        let (result, shadow) = match draft {
            ModuleDraft::Finance(finance) => {
                let scope = FinanceScope {
                    day: now.date_naive(),
                    category: finance.category.clone(),
                };
                self.verifier
                    .verify_finance(&scope, finance.amount.unwrap_or_default(), commit)
                    .await
            }
            ModuleDraft::Todo(_) => self.verifier.verify_todo(commit).await,
            ModuleDraft::Crypto(_) => self.verifier.verify_crypto(commit).await,
            ModuleDraft::Link(_) => self.verifier.verify_link(commit).await,
        };
        (Some(result), Some(shadow))
    }

    fn unresolved_outcome(&self, signal: &RawSignal, decision: DispatcherDecision) -> RouteOutcome {
        let payload = serde_json::json!({
            "reason": decision.reason,
            "escalation": "query_fallback_with_context",
        });
        let handshake = HandshakeEvent::new(
            signal.signal_id,
            None,
            HandshakeStatus::PendingConfirmation,
            payload,
        );

        info!(signal_id = %signal.signal_id, "signal unresolved, escalating to fallback");

        RouteOutcome {
            signal_id: signal.signal_id,
            strategy: decision.strategy,
            route: SignalRoute::Unresolved,
            confidence: decision.confidence,
            reason: decision.reason,
            strict_parameters_met: false,
            draft: None,
            missing_fields: Vec::new(),
            next_action: NextAction::QueryFallbackWithContext,
            deductions: Vec::new(),
            commit: None,
            shadow: None,
            handshake,
        }
    }
}

/// Fold kept deductions into the decision context.
///
/// Corroborating kinds nudge confidence up a little; a spending
/// anomaly makes the pipeline more cautious. The dispatcher stays the
/// calibration authority — nudges are small and bounded.
fn merge_deductions(
    base_confidence: f64,
    mut reason: Vec<String>,
    deductions: &[Deduction],
) -> (f64, Vec<String>) {
    let mut confidence = base_confidence;
    for deduction in deductions {
        reason.push(format!("sherlock:{}", deduction.kind));
        match deduction.kind {
            DeductionKind::CalendarCorrelation | DeductionKind::RoutineDetected => {
                confidence = (confidence + 0.02).min(0.99);
            }
            DeductionKind::SpendingVelocity => {
                confidence = (confidence - 0.05).max(0.0);
            }
            DeductionKind::FinancialPrefill => {}
        }
    }
    (confidence, reason)
}

fn handshake_payload(
    commit_decision: &AutoCommitDecision,
    confidence: f64,
    decision: &DispatcherDecision,
    deductions: &[Deduction],
    shadow: Option<&ShadowPlanResult>,
) -> serde_json::Value {
    serde_json::json!({
        "risk_tier": commit_decision.risk_tier,
        "dynamic_threshold": commit_decision.dynamic_threshold,
        "confidence": confidence,
        "strategy": decision.strategy,
        "deductions": deductions,
        "shadow_verdict": shadow.map(|s| s.verdict),
        "forensic_note": shadow.map(|s| s.forensic_note.clone()),
    })
}

fn status_tag(status: &HandshakeStatus) -> &'static str {
    match status {
        HandshakeStatus::PendingConfirmation => "pending_confirmation",
        HandshakeStatus::Approved => "approved",
        HandshakeStatus::Rejected => "rejected",
        HandshakeStatus::Failed => "failed",
        HandshakeStatus::AutoCommitted => "auto_committed",
    }
}
