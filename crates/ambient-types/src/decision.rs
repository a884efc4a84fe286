use serde::{Deserialize, Serialize};

use crate::draft::{CryptoAction, DueHint, TodoPriority};

/// The four action domains a signal can commit into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionModule {
    Finance,
    Todo,
    Crypto,
    Links,
}

impl ActionModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionModule::Finance => "finance",
            ActionModule::Todo => "todo",
            ActionModule::Crypto => "crypto",
            ActionModule::Links => "links",
        }
    }
}

impl std::fmt::Display for ActionModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatcher routing target: a resolved module or the unresolved sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalRoute {
    Finance,
    Todo,
    Crypto,
    Links,
    Unresolved,
}

impl SignalRoute {
    /// The module behind this route, if resolved.
    pub fn module(&self) -> Option<ActionModule> {
        match self {
            SignalRoute::Finance => Some(ActionModule::Finance),
            SignalRoute::Todo => Some(ActionModule::Todo),
            SignalRoute::Crypto => Some(ActionModule::Crypto),
            SignalRoute::Links => Some(ActionModule::Links),
            SignalRoute::Unresolved => None,
        }
    }
}

impl From<ActionModule> for SignalRoute {
    fn from(module: ActionModule) -> Self {
        match module {
            ActionModule::Finance => SignalRoute::Finance,
            ActionModule::Todo => SignalRoute::Todo,
            ActionModule::Crypto => SignalRoute::Crypto,
            ActionModule::Links => SignalRoute::Links,
        }
    }
}

impl std::fmt::Display for SignalRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.module() {
            Some(m) => f.write_str(m.as_str()),
            None => f.write_str("unresolved"),
        }
    }
}

/// Which path resolves the signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Enough fields were extracted locally; no fallback needed.
    TacticalReflex,
    /// The fallback language model (or the user) must close the gap.
    SemanticDeepDive,
}

/// Domain-tagged bag of nullable extractions. A matcher fills only the
/// fields it understands; everything else stays `None`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub merchant: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub todo_title: Option<String>,
    pub todo_priority: Option<TodoPriority>,
    pub due_hint: Option<DueHint>,
    pub crypto_action: Option<CryptoAction>,
    pub crypto_symbol: Option<String>,
    pub crypto_amount: Option<f64>,
    pub crypto_price: Option<f64>,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    /// Free-form keywords the matchers considered salient.
    pub keywords: Vec<String>,
}

/// Output of the Reflex Dispatcher for one signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatcherDecision {
    pub route: SignalRoute,
    pub strategy: Strategy,
    /// Calibrated confidence, 0.0..=1.0.
    pub confidence: f64,
    /// True only when every field required for autonomous action is
    /// present and internally consistent.
    pub strict_parameters_met: bool,
    /// Ordered machine-readable tags explaining the decision.
    pub reason: Vec<String>,
    pub extracted: ExtractedFields,
}

impl DispatcherDecision {
    /// The sentinel decision for signals no matcher could resolve.
    pub fn unresolved(reason: Vec<String>) -> Self {
        Self {
            route: SignalRoute::Unresolved,
            strategy: Strategy::SemanticDeepDive,
            confidence: 0.0,
            strict_parameters_met: false,
            reason,
            extracted: ExtractedFields::default(),
        }
    }
}
