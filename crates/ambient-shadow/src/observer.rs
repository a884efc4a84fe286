//! The aggregate read interface the verifier snapshots through.

use ambient_types::{CryptoAggregate, FinanceAggregate, TodoAggregate};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ObserveError;

/// Scope of the finance aggregate: today's entries for one category
/// (or all categories when `category` is `None`). The user is implicit;
/// request-scoped isolation is the caller's responsibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceScope {
    pub day: NaiveDate,
    pub category: Option<String>,
}

/// Point reads of the aggregates the shadow plan diffs.
///
/// Reads must be idempotent: two calls without an intervening write
/// return identical snapshots.
#[async_trait]
pub trait AggregateReader: Send + Sync {
    async fn finance_aggregate(&self, scope: &FinanceScope)
        -> Result<FinanceAggregate, ObserveError>;

    async fn todo_aggregate(&self) -> Result<TodoAggregate, ObserveError>;

    async fn crypto_aggregate(&self) -> Result<CryptoAggregate, ObserveError>;
}
