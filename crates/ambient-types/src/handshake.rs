use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decision::ActionModule;

/// Resolution status of a proposed or executed action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeStatus {
    PendingConfirmation,
    Approved,
    Rejected,
    Failed,
    AutoCommitted,
}

/// What the caller should do next with this signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    AmbientFinanceHandshake,
    AmbientTodoHandshake,
    AmbientCryptoHandshake,
    AmbientLinksHandshake,
    /// Module resolved but a required field is missing; ask the user.
    AmbientClarification,
    /// No module resolved; escalate to the fallback model with context.
    QueryFallbackWithContext,
    AutoCommitted,
}

impl NextAction {
    /// The confirmation handshake for a resolved module.
    pub fn handshake_for(module: ActionModule) -> Self {
        match module {
            ActionModule::Finance => NextAction::AmbientFinanceHandshake,
            ActionModule::Todo => NextAction::AmbientTodoHandshake,
            ActionModule::Crypto => NextAction::AmbientCryptoHandshake,
            ActionModule::Links => NextAction::AmbientLinksHandshake,
        }
    }
}

/// The durable audit record of every decision. Append-only: the core
/// proposes the status at creation time and never edits it afterward.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandshakeEvent {
    pub event_id: Uuid,
    pub signal_id: Uuid,
    /// Absent for unresolved signals that went straight to the fallback.
    pub module: Option<ActionModule>,
    pub status: HandshakeStatus,
    /// Forensic payload: risk tier, dynamic threshold, kept deductions.
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl HandshakeEvent {
    pub fn new(
        signal_id: Uuid,
        module: Option<ActionModule>,
        status: HandshakeStatus,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            signal_id,
            module,
            status,
            payload,
            created_at: Utc::now(),
        }
    }
}
