//! Crypto matcher: action verb + known ticker, with optional quantity
//! and unit price. Matches only log intents — execution is out of scope.

use ambient_types::{RawSignal, SignalRoute};

use crate::amount::parse_number;
use crate::lexicon::{contains_word, Lexicon};
use crate::matchers::{clean_tokens, MatchCandidate};

const CAP: f64 = 0.97;

pub fn evaluate(signal: &RawSignal, lexicon: &Lexicon) -> MatchCandidate {
    let mut candidate = MatchCandidate::empty(SignalRoute::Crypto);
    let text = signal.normalized_text.as_str();
    let tokens = clean_tokens(text);

    let mut score: f64 = 0.0;

    let action = tokens.iter().find_map(|t| {
        lexicon
            .crypto_verbs
            .iter()
            .find(|(verb, _)| verb == t)
            .map(|(_, action)| *action)
    });
    if let Some(action) = action {
        score += 0.40;
        candidate.reason.push("crypto:action".into());
        candidate.extracted.crypto_action = Some(action);
    }

    let symbol_idx = tokens
        .iter()
        .position(|t| lexicon.ticker_for(t).is_some());
    if let Some(idx) = symbol_idx {
        let ticker = lexicon.ticker_for(tokens[idx]).unwrap_or_default();
        score += 0.38;
        candidate.reason.push("crypto:symbol".into());
        candidate.extracted.crypto_symbol = Some(ticker.to_string());

        // Quantity is the number directly before the ticker ("0.05 btc").
        if idx > 0 {
            if let Some(qty) = parse_number(tokens[idx - 1]) {
                score += 0.06;
                candidate.reason.push("crypto:quantity".into());
                candidate.extracted.crypto_amount = Some(qty);
            }
        }
    } else if lexicon.crypto_nouns.iter().any(|n| contains_word(text, n)) {
        // Domain identified without a tradable symbol; the fallback has
        // to pin the asset down.
        score += 0.12;
        candidate.reason.push("crypto:generic_asset".into());
    }

    if let Some(price) = find_unit_price(&tokens, candidate.extracted.crypto_amount) {
        score += 0.06;
        candidate.reason.push("crypto:price".into());
        candidate.extracted.crypto_price = Some(price);
    }

    if contains_word(text, "dca") {
        score += 0.05;
        candidate.reason.push("crypto:dca".into());
        candidate.extracted.keywords.push("dca".into());
    }

    candidate.confidence = score.min(CAP);
    candidate.strict_parameters_met = candidate.extracted.crypto_action.is_some()
        && candidate.extracted.crypto_symbol.is_some();
    candidate.reason.push(
        if candidate.extracted.crypto_action.is_some() {
            "crypto_action_present"
        } else {
            "crypto_action_missing"
        }
        .into(),
    );
    candidate.reason.push(
        if candidate.extracted.crypto_symbol.is_some() {
            "crypto_symbol_present"
        } else {
            "crypto_symbol_missing"
        }
        .into(),
    );
    candidate
}

/// Unit price: the number following "a" or "@" ("0.05 btc a 62000 usd"),
/// skipping the quantity itself.
fn find_unit_price(tokens: &[&str], quantity: Option<f64>) -> Option<f64> {
    for (idx, token) in tokens.iter().enumerate() {
        if *token == "a" || *token == "@" {
            if let Some(next) = tokens.get(idx + 1) {
                if let Some(value) = parse_number(next) {
                    if Some(value) != quantity {
                        return Some(value);
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient_types::{CryptoAction, SignalKind};

    fn lexicon() -> Lexicon {
        Lexicon::default_pt()
    }

    #[test]
    fn buy_with_symbol_quantity_and_price_is_strict() {
        let signal = RawSignal::new(SignalKind::Text, "bro comprar 0.05 btc a 62000 usd em dca");
        let candidate = evaluate(&signal, &lexicon());
        assert!(candidate.strict_parameters_met);
        assert_eq!(candidate.extracted.crypto_action, Some(CryptoAction::Buy));
        assert_eq!(candidate.extracted.crypto_symbol.as_deref(), Some("BTC"));
        assert!((candidate.extracted.crypto_amount.unwrap() - 0.05).abs() < 1e-9);
        assert!((candidate.extracted.crypto_price.unwrap() - 62000.0).abs() < 1e-9);
        assert!(candidate.confidence > 0.9);
    }

    #[test]
    fn action_without_symbol_identifies_module_only() {
        let signal = RawSignal::new(SignalKind::Text, "quero comprar cripto");
        let candidate = evaluate(&signal, &lexicon());
        assert!(!candidate.strict_parameters_met);
        assert!(candidate.confidence >= 0.45);
        assert!(candidate.reason.iter().any(|r| r == "crypto:generic_asset"));
        assert!(candidate.reason.iter().any(|r| r == "crypto_symbol_missing"));
    }

    #[test]
    fn asset_name_alias_resolves_to_ticker() {
        let signal = RawSignal::new(SignalKind::Text, "vender ethereum hoje");
        let candidate = evaluate(&signal, &lexicon());
        assert_eq!(candidate.extracted.crypto_action, Some(CryptoAction::Sell));
        assert_eq!(candidate.extracted.crypto_symbol.as_deref(), Some("ETH"));
        assert!(candidate.strict_parameters_met);
    }

    #[test]
    fn hold_is_an_action() {
        let signal = RawSignal::new(SignalKind::Text, "hold sol por agora");
        let candidate = evaluate(&signal, &lexicon());
        assert_eq!(candidate.extracted.crypto_action, Some(CryptoAction::Hold));
        assert_eq!(candidate.extracted.crypto_symbol.as_deref(), Some("SOL"));
    }

    #[test]
    fn finance_text_scores_below_floor() {
        let signal = RawSignal::new(SignalKind::Text, "ya fatura continente 45,90 eur foi hoje");
        let candidate = evaluate(&signal, &lexicon());
        assert!(candidate.confidence < 0.45);
    }
}
