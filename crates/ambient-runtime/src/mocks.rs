//! In-memory store standing in for the external persistence layer.
//!
//! One struct implements all four domain writers plus the aggregate
//! reader, so tests observe exactly the state the writers mutate —
//! including interleaved writes tests inject to provoke anomalies.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use ambient_policy::{CryptoIntentWriter, FinanceWriter, LinkWriter, TodoWriter, WriteReceipt};
use ambient_policy::WriteError;
use ambient_shadow::{AggregateReader, FinanceScope, ObserveError};
use ambient_types::{
    CryptoAggregate, CryptoDraft, FinanceAggregate, FinanceDraft, LinkDraft, TodoAggregate,
    TodoDraft,
};
use async_trait::async_trait;

#[derive(Default)]
pub struct InMemoryStore {
    finance_entries: Mutex<Vec<FinanceDraft>>,
    todos: Mutex<Vec<TodoDraft>>,
    intents: Mutex<Vec<CryptoDraft>>,
    links: Mutex<Vec<LinkDraft>>,
    next_id: AtomicU64,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write report a persistence failure.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert a finance row out-of-band, simulating a concurrent writer.
    pub fn inject_finance(&self, draft: FinanceDraft) {
        self.finance_entries.lock().expect("store lock").push(draft);
    }

    pub fn finance_count(&self) -> usize {
        self.finance_entries.lock().expect("store lock").len()
    }

    pub fn todo_count(&self) -> usize {
        self.todos.lock().expect("store lock").len()
    }

    pub fn intent_count(&self) -> usize {
        self.intents.lock().expect("store lock").len()
    }

    pub fn link_count(&self) -> usize {
        self.links.lock().expect("store lock").len()
    }

    fn receipt(&self, prefix: &str) -> Result<WriteReceipt, WriteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WriteError::Persistence("store unavailable".into()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(WriteReceipt::success(format!("{prefix}-{id:04}")))
    }
}

#[async_trait]
impl FinanceWriter for InMemoryStore {
    async fn insert(&self, draft: &FinanceDraft) -> Result<WriteReceipt, WriteError> {
        let receipt = self.receipt("fin")?;
        self.finance_entries
            .lock()
            .expect("store lock")
            .push(draft.clone());
        Ok(receipt)
    }
}

#[async_trait]
impl TodoWriter for InMemoryStore {
    async fn insert(&self, draft: &TodoDraft) -> Result<WriteReceipt, WriteError> {
        let receipt = self.receipt("todo")?;
        self.todos.lock().expect("store lock").push(draft.clone());
        Ok(receipt)
    }
}

#[async_trait]
impl CryptoIntentWriter for InMemoryStore {
    async fn log_intent(&self, draft: &CryptoDraft) -> Result<WriteReceipt, WriteError> {
        let receipt = self.receipt("intent")?;
        self.intents.lock().expect("store lock").push(draft.clone());
        Ok(receipt)
    }
}

#[async_trait]
impl LinkWriter for InMemoryStore {
    async fn insert(&self, draft: &LinkDraft) -> Result<WriteReceipt, WriteError> {
        let receipt = self.receipt("link")?;
        self.links.lock().expect("store lock").push(draft.clone());
        Ok(receipt)
    }
}

#[async_trait]
impl AggregateReader for InMemoryStore {
    async fn finance_aggregate(
        &self,
        scope: &FinanceScope,
    ) -> Result<FinanceAggregate, ObserveError> {
        let entries = self.finance_entries.lock().expect("store lock");
        let scoped: Vec<&FinanceDraft> = entries
            .iter()
            .filter(|e| match &scope.category {
                Some(category) => e.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .collect();
        Ok(FinanceAggregate {
            entry_count: scoped.len() as u64,
            amount_sum: scoped.iter().filter_map(|e| e.amount).sum(),
        })
    }

    async fn todo_aggregate(&self) -> Result<TodoAggregate, ObserveError> {
        Ok(TodoAggregate {
            open_count: self.todos.lock().expect("store lock").len() as u64,
        })
    }

    async fn crypto_aggregate(&self) -> Result<CryptoAggregate, ObserveError> {
        Ok(CryptoAggregate {
            intent_count: self.intents.lock().expect("store lock").len() as u64,
        })
    }
}
