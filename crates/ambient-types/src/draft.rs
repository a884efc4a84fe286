use serde::{Deserialize, Serialize};

use crate::decision::ActionModule;

/// Task priority inferred from urgency keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    Normal,
    High,
    Urgent,
}

/// Coarse due-date bucket. Exact scheduling is out of scope; the bucket
/// is enough for the task surface to sort on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueHint {
    Today,
    Tomorrow,
    ThisWeek,
    Deadline,
    None,
}

/// Crypto intent verb. Intents are logged, never executed on-chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CryptoAction {
    Buy,
    Sell,
    Swap,
    Hold,
}

impl CryptoAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CryptoAction::Buy => "buy",
            CryptoAction::Sell => "sell",
            CryptoAction::Swap => "swap",
            CryptoAction::Hold => "hold",
        }
    }
}

impl std::fmt::Display for CryptoAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draft of a financial entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinanceDraft {
    pub merchant: Option<String>,
    pub amount: Option<f64>,
    pub currency: String,
    pub category: Option<String>,
    /// Free-text description, original casing.
    pub description: String,
    pub confidence: f64,
    pub strict_parameters_met: bool,
}

/// Draft of a task entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoDraft {
    pub title: String,
    pub priority: TodoPriority,
    pub due_hint: DueHint,
    pub confidence: f64,
    pub strict_parameters_met: bool,
}

/// Draft of a crypto intent log entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CryptoDraft {
    pub action: Option<CryptoAction>,
    pub symbol: Option<String>,
    pub amount: Option<f64>,
    pub price: Option<f64>,
    pub confidence: f64,
    pub strict_parameters_met: bool,
}

/// Draft of a saved link.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkDraft {
    pub url: Option<String>,
    pub title: Option<String>,
    pub confidence: f64,
    pub strict_parameters_met: bool,
}

/// Exactly one draft variant is produced per resolved signal.
///
/// The module set is a stable domain boundary: risk classification and
/// execution match exhaustively on this enum, so adding a domain is a
/// compile-visible change everywhere it matters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum ModuleDraft {
    Finance(FinanceDraft),
    Todo(TodoDraft),
    Crypto(CryptoDraft),
    Link(LinkDraft),
}

impl ModuleDraft {
    pub fn module(&self) -> ActionModule {
        match self {
            ModuleDraft::Finance(_) => ActionModule::Finance,
            ModuleDraft::Todo(_) => ActionModule::Todo,
            ModuleDraft::Crypto(_) => ActionModule::Crypto,
            ModuleDraft::Link(_) => ActionModule::Links,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            ModuleDraft::Finance(d) => d.confidence,
            ModuleDraft::Todo(d) => d.confidence,
            ModuleDraft::Crypto(d) => d.confidence,
            ModuleDraft::Link(d) => d.confidence,
        }
    }

    /// A draft is only eligible for autonomous commit when this is true.
    pub fn strict_parameters_met(&self) -> bool {
        match self {
            ModuleDraft::Finance(d) => d.strict_parameters_met,
            ModuleDraft::Todo(d) => d.strict_parameters_met,
            ModuleDraft::Crypto(d) => d.strict_parameters_met,
            ModuleDraft::Link(d) => d.strict_parameters_met,
        }
    }

    /// Names of the required fields this draft is still missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self {
            ModuleDraft::Finance(d) => {
                if d.merchant.is_none() {
                    missing.push("merchant");
                }
                if d.amount.is_none() {
                    missing.push("amount");
                }
            }
            ModuleDraft::Todo(d) => {
                if d.title.trim().is_empty() {
                    missing.push("todo_title");
                }
            }
            ModuleDraft::Crypto(d) => {
                if d.action.is_none() {
                    missing.push("crypto_action");
                }
                if d.symbol.is_none() {
                    missing.push("crypto_symbol");
                }
            }
            ModuleDraft::Link(d) => {
                if d.url.is_none() {
                    missing.push("link_url");
                }
            }
        }
        missing
    }
}
