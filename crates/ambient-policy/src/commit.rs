//! The auto-commit decision and its execution path.

use ambient_types::{AutoCommitResult, ModuleDraft, RiskTier};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::risk::{classify_risk, RiskThresholds};
use crate::writers::{WriteReceipt, WriterSet};

/// Whether a draft may be written without confirmation, with the tier
/// and bar reported either way for observability.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AutoCommitDecision {
    pub auto_commit: bool,
    pub risk_tier: RiskTier,
    pub dynamic_threshold: f64,
}

/// Pure decision layer over the threshold table.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoCommitPolicy {
    thresholds: RiskThresholds,
}

impl AutoCommitPolicy {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Decide autonomy for a draft at the given (possibly
    /// deduction-adjusted) confidence.
    ///
    /// Strict parameters gate everything: without them the decision is
    /// always "ask first", but tier and threshold are still computed so
    /// the audit trail shows the bar that would have applied.
    pub fn decide(
        &self,
        draft: &ModuleDraft,
        confidence: f64,
        strict_parameters_met: bool,
    ) -> AutoCommitDecision {
        let risk_tier = classify_risk(draft);
        let dynamic_threshold = self.thresholds.threshold(risk_tier);
        let auto_commit = strict_parameters_met && confidence >= dynamic_threshold;

        debug!(
            module = %draft.module(),
            %risk_tier,
            dynamic_threshold,
            confidence,
            auto_commit,
            "auto-commit decision"
        );

        AutoCommitDecision {
            auto_commit,
            risk_tier,
            dynamic_threshold,
        }
    }
}

/// Dispatches an approved draft to its domain writer.
pub struct CommitExecutor {
    writers: WriterSet,
}

impl CommitExecutor {
    pub fn new(writers: WriterSet) -> Self {
        Self { writers }
    }

    /// Execute the domain write once and fold the receipt into an
    /// immutable [`AutoCommitResult`].
    ///
    /// Missing required fields short-circuit before any writer call;
    /// writer errors become `executed = false` with the underlying
    /// message embedded — never a retry.
    pub async fn execute(
        &self,
        draft: &ModuleDraft,
        decision: &AutoCommitDecision,
        confidence: f64,
    ) -> AutoCommitResult {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            warn!(module = %draft.module(), ?missing, "commit short-circuited");
            return self.fold(
                draft,
                decision,
                confidence,
                WriteReceipt::failure(format!("missing_fields:{}", missing.join(","))),
            );
        }

        let outcome = match draft {
            ModuleDraft::Finance(finance) => self.writers.finance.insert(finance).await,
            ModuleDraft::Todo(todo) => self.writers.todo.insert(todo).await,
            ModuleDraft::Crypto(crypto) => self.writers.crypto.log_intent(crypto).await,
            ModuleDraft::Link(link) => self.writers.link.insert(link).await,
        };

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(err) => WriteReceipt::failure(format!("write_failed: {err}")),
        };

        if receipt.executed {
            info!(
                module = %draft.module(),
                external_id = receipt.external_id.as_deref().unwrap_or("-"),
                "autonomous write committed"
            );
        } else {
            warn!(module = %draft.module(), reason = %receipt.reason, "write not executed");
        }

        self.fold(draft, decision, confidence, receipt)
    }

    fn fold(
        &self,
        draft: &ModuleDraft,
        decision: &AutoCommitDecision,
        confidence: f64,
        receipt: WriteReceipt,
    ) -> AutoCommitResult {
        AutoCommitResult {
            executed: receipt.executed,
            module: draft.module(),
            risk_tier: decision.risk_tier,
            dynamic_threshold: decision.dynamic_threshold,
            confidence,
            external_id: receipt.external_id,
            reason: receipt.reason,
        }
    }
}
