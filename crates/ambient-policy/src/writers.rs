//! Per-domain writer interfaces, injected by the hosting process.
//!
//! The crypto writer is intent-logging only; nothing in this crate may
//! submit an on-chain or exchange order.

use ambient_types::{CryptoDraft, FinanceDraft, LinkDraft, TodoDraft};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::WriteError;

/// What a writer reports back for one insert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WriteReceipt {
    pub executed: bool,
    pub external_id: Option<String>,
    pub reason: String,
}

impl WriteReceipt {
    pub fn success(external_id: impl Into<String>) -> Self {
        Self {
            executed: true,
            external_id: Some(external_id.into()),
            reason: "committed".into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            executed: false,
            external_id: None,
            reason: reason.into(),
        }
    }
}

#[async_trait]
pub trait FinanceWriter: Send + Sync {
    async fn insert(&self, draft: &FinanceDraft) -> Result<WriteReceipt, WriteError>;
}

#[async_trait]
pub trait TodoWriter: Send + Sync {
    async fn insert(&self, draft: &TodoDraft) -> Result<WriteReceipt, WriteError>;
}

/// Logs the intent record. MUST NOT execute the trade.
#[async_trait]
pub trait CryptoIntentWriter: Send + Sync {
    async fn log_intent(&self, draft: &CryptoDraft) -> Result<WriteReceipt, WriteError>;
}

#[async_trait]
pub trait LinkWriter: Send + Sync {
    async fn insert(&self, draft: &LinkDraft) -> Result<WriteReceipt, WriteError>;
}

/// The four writers bundled for exhaustive dispatch.
#[derive(Clone)]
pub struct WriterSet {
    pub finance: Arc<dyn FinanceWriter>,
    pub todo: Arc<dyn TodoWriter>,
    pub crypto: Arc<dyn CryptoIntentWriter>,
    pub link: Arc<dyn LinkWriter>,
}
