//! The reflex dispatcher: runs all four domain matchers, picks the
//! strongest claim, and decides whether the reflex path suffices.

use ambient_types::{
    CryptoDraft, DispatcherDecision, DueHint, FinanceDraft, LinkDraft, ModuleDraft, RawSignal,
    SignalRoute, Strategy, TodoDraft, TodoPriority,
};
use tracing::debug;

use crate::lexicon::Lexicon;
use crate::matchers::{crypto, finance, links, todo, MatchCandidate};

/// Dispatcher tuning knobs.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Minimum winning confidence for a signal to resolve at all
    /// (default: 0.45). Below it the signal escalates unresolved.
    pub confidence_floor: f64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.45,
        }
    }
}

/// Rule-based signal classifier. Pure and deterministic: same signal
/// plus same lexicon always yields the same decision, and no input —
/// including the empty string — produces an error.
pub struct ReflexDispatcher {
    lexicon: Lexicon,
    config: DispatcherConfig,
}

impl ReflexDispatcher {
    pub fn new(lexicon: Lexicon, config: DispatcherConfig) -> Self {
        Self { lexicon, config }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify one signal into a routing decision.
    pub fn evaluate(&self, signal: &RawSignal) -> DispatcherDecision {
        if signal.is_empty() {
            return DispatcherDecision::unresolved(vec!["dispatch:empty_signal".into()]);
        }

        let candidates = [
            finance::evaluate(signal, &self.lexicon),
            todo::evaluate(signal, &self.lexicon),
            crypto::evaluate(signal, &self.lexicon),
            links::evaluate(signal, &self.lexicon),
        ];

        // Highest local confidence wins; on a tie the matcher order
        // (finance, todo, crypto, links) is the stable tie-break.
        let winner = candidates
            .into_iter()
            .reduce(|best, next| if next.confidence > best.confidence { next } else { best })
            .unwrap_or_else(|| MatchCandidate::empty(SignalRoute::Unresolved));

        if winner.confidence < self.config.confidence_floor {
            debug!(
                signal_id = %signal.signal_id,
                best_route = %winner.route,
                confidence = winner.confidence,
                "no matcher above floor"
            );
            return DispatcherDecision::unresolved(vec![
                "dispatch:no_matcher_above_floor".into(),
            ]);
        }

        let strategy = if winner.strict_parameters_met {
            Strategy::TacticalReflex
        } else {
            Strategy::SemanticDeepDive
        };

        debug!(
            signal_id = %signal.signal_id,
            route = %winner.route,
            ?strategy,
            confidence = winner.confidence,
            "signal dispatched"
        );

        DispatcherDecision {
            route: winner.route,
            strategy,
            confidence: winner.confidence.clamp(0.0, 1.0),
            strict_parameters_met: winner.strict_parameters_met,
            reason: winner.reason,
            extracted: winner.extracted,
        }
    }
}

impl Default for ReflexDispatcher {
    fn default() -> Self {
        Self::new(Lexicon::default_pt(), DispatcherConfig::default())
    }
}

/// Materialize the module draft for a resolved decision.
///
/// Returns `None` for unresolved routes; the draft carries the original
/// raw text as its description so storage keeps the user's casing.
pub fn build_draft(signal: &RawSignal, decision: &DispatcherDecision) -> Option<ModuleDraft> {
    let extracted = &decision.extracted;
    let draft = match decision.route {
        SignalRoute::Finance => ModuleDraft::Finance(FinanceDraft {
            merchant: extracted.merchant.clone(),
            amount: extracted.amount,
            currency: extracted.currency.clone().unwrap_or_else(|| "EUR".into()),
            category: extracted.category.clone(),
            description: signal.raw_text.clone(),
            confidence: decision.confidence,
            strict_parameters_met: decision.strict_parameters_met,
        }),
        SignalRoute::Todo => ModuleDraft::Todo(TodoDraft {
            title: extracted.todo_title.clone().unwrap_or_default(),
            priority: extracted.todo_priority.unwrap_or(TodoPriority::Normal),
            due_hint: extracted.due_hint.unwrap_or(DueHint::None),
            confidence: decision.confidence,
            strict_parameters_met: decision.strict_parameters_met,
        }),
        SignalRoute::Crypto => ModuleDraft::Crypto(CryptoDraft {
            action: extracted.crypto_action,
            symbol: extracted.crypto_symbol.clone(),
            amount: extracted.crypto_amount,
            price: extracted.crypto_price,
            confidence: decision.confidence,
            strict_parameters_met: decision.strict_parameters_met,
        }),
        SignalRoute::Links => ModuleDraft::Link(LinkDraft {
            url: extracted.link_url.clone(),
            title: extracted.link_title.clone(),
            confidence: decision.confidence,
            strict_parameters_met: decision.strict_parameters_met,
        }),
        SignalRoute::Unresolved => return None,
    };
    Some(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient_types::{ActionModule, CryptoAction, SignalKind};

    fn dispatcher() -> ReflexDispatcher {
        ReflexDispatcher::default()
    }

    #[test]
    fn finance_receipt_text_goes_tactical() {
        let signal = RawSignal::new(SignalKind::Text, "ya fatura continente 45,90 eur foi hoje");
        let decision = dispatcher().evaluate(&signal);
        assert_eq!(decision.route, SignalRoute::Finance);
        assert_eq!(decision.strategy, Strategy::TacticalReflex);
        assert!(decision.strict_parameters_met);
        assert!((decision.extracted.amount.unwrap() - 45.9).abs() < 1e-9);
        assert_eq!(decision.extracted.merchant.as_deref(), Some("Continente"));
    }

    #[test]
    fn reminder_text_goes_to_todo() {
        let signal = RawSignal::new(
            SignalKind::Text,
            "mano lembra me pagar o seguro da carrinha amanha",
        );
        let decision = dispatcher().evaluate(&signal);
        assert_eq!(decision.route, SignalRoute::Todo);
        assert!(decision.strict_parameters_met);
        assert!(!decision.extracted.todo_title.as_deref().unwrap().is_empty());
    }

    #[test]
    fn crypto_intent_goes_tactical() {
        let signal = RawSignal::new(SignalKind::Text, "bro comprar 0.05 btc a 62000 usd em dca");
        let decision = dispatcher().evaluate(&signal);
        assert_eq!(decision.route, SignalRoute::Crypto);
        assert_eq!(decision.strategy, Strategy::TacticalReflex);
        assert_eq!(decision.extracted.crypto_action, Some(CryptoAction::Buy));
        assert_eq!(decision.extracted.crypto_symbol.as_deref(), Some("BTC"));
        assert!((decision.extracted.crypto_amount.unwrap() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn link_share_goes_tactical_with_normalized_url() {
        let signal = RawSignal::new(
            SignalKind::Text,
            "guarda ai este site interessante www.openai.com/research",
        );
        let decision = dispatcher().evaluate(&signal);
        assert_eq!(decision.route, SignalRoute::Links);
        assert_eq!(decision.strategy, Strategy::TacticalReflex);
        assert_eq!(
            decision.extracted.link_url.as_deref(),
            Some("https://www.openai.com/research")
        );
    }

    #[test]
    fn incomplete_crypto_and_link_signals_need_deep_dive() {
        let crypto_signal = RawSignal::new(SignalKind::Text, "quero comprar cripto");
        let decision = dispatcher().evaluate(&crypto_signal);
        assert_eq!(decision.route, SignalRoute::Crypto);
        assert_eq!(decision.strategy, Strategy::SemanticDeepDive);

        let link_signal = RawSignal::new(SignalKind::Text, "guarda este link para mim");
        let decision = dispatcher().evaluate(&link_signal);
        assert_eq!(decision.route, SignalRoute::Links);
        assert_eq!(decision.strategy, Strategy::SemanticDeepDive);
    }

    #[test]
    fn empty_and_garbled_signals_resolve_unresolved() {
        let empty = RawSignal::new(SignalKind::Text, "");
        let decision = dispatcher().evaluate(&empty);
        assert_eq!(decision.route, SignalRoute::Unresolved);
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.strategy, Strategy::SemanticDeepDive);

        let garbled = RawSignal::new(SignalKind::Voice, "qwz brfx ploing");
        let decision = dispatcher().evaluate(&garbled);
        assert_eq!(decision.route, SignalRoute::Unresolved);
        assert!(!decision.strict_parameters_met);
    }

    #[test]
    fn tactical_reflex_implies_strict_parameters() {
        let texts = [
            "ya fatura continente 45,90 eur foi hoje",
            "mano lembra me pagar o seguro da carrinha amanha",
            "bro comprar 0.05 btc a 62000 usd em dca",
            "guarda ai este site interessante www.openai.com/research",
            "quero comprar cripto",
            "guarda este link para mim",
            "qwz brfx",
            "",
        ];
        for text in texts {
            let signal = RawSignal::new(SignalKind::Text, text);
            let decision = dispatcher().evaluate(&signal);
            assert!(
                decision.confidence >= 0.0 && decision.confidence <= 1.0,
                "confidence out of range for {text:?}"
            );
            if decision.strategy == Strategy::TacticalReflex {
                assert!(
                    decision.strict_parameters_met,
                    "tactical reflex without strict parameters for {text:?}"
                );
            }
        }
    }

    #[test]
    fn reason_names_the_winning_matcher() {
        let signal = RawSignal::new(SignalKind::Text, "ya fatura continente 45,90 eur foi hoje");
        let decision = dispatcher().evaluate(&signal);
        assert!(decision.reason.iter().any(|r| r.starts_with("finance:")));
    }

    #[test]
    fn draft_is_built_for_resolved_routes_only() {
        let signal = RawSignal::new(SignalKind::Text, "ya fatura continente 45,90 eur foi hoje");
        let decision = dispatcher().evaluate(&signal);
        let draft = build_draft(&signal, &decision).unwrap();
        assert_eq!(draft.module(), ActionModule::Finance);
        assert!(draft.strict_parameters_met());

        let empty = RawSignal::new(SignalKind::Text, "");
        let decision = dispatcher().evaluate(&empty);
        assert!(build_draft(&empty, &decision).is_none());
    }
}
