//! Domain matchers. Each runs independently against the normalized
//! text, scores its own confidence, and reports the field-presence tags
//! that feed the strict-parameter check.

pub mod crypto;
pub mod finance;
pub mod links;
pub mod todo;

use ambient_types::{ExtractedFields, SignalRoute};

/// One matcher's scored claim on a signal.
#[derive(Clone, Debug)]
pub struct MatchCandidate {
    pub route: SignalRoute,
    pub confidence: f64,
    pub strict_parameters_met: bool,
    pub reason: Vec<String>,
    pub extracted: ExtractedFields,
}

impl MatchCandidate {
    pub(crate) fn empty(route: SignalRoute) -> Self {
        Self {
            route,
            confidence: 0.0,
            strict_parameters_met: false,
            reason: Vec::new(),
            extracted: ExtractedFields::default(),
        }
    }
}

/// Whitespace tokens with surrounding punctuation trimmed, keeping the
/// separators inside numbers ("45,90") and URLs intact.
pub(crate) fn clean_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '€' && c != '$' && c != '£'))
        .filter(|t| !t.is_empty())
        .collect()
}
