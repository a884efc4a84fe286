//! Finance matcher: currency/amount tokens plus a merchant signal.

use std::sync::OnceLock;

use ambient_types::{RawSignal, SignalRoute};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;

use crate::amount::best_amount;
use crate::lexicon::{contains_word, Lexicon};
use crate::matchers::{clean_tokens, MatchCandidate};

const CAP: f64 = 0.98;
/// OCR traces below this confidence fall back to text heuristics.
const OCR_TRUST_FLOOR: f64 = 0.75;

fn prepositional_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "no X" / "na X" — the canonical spoken-Portuguese way of naming
    // the place money was spent.
    RE.get_or_init(|| Regex::new(r"\b(?:no|na)\s+([a-z][a-z0-9]{2,})").expect("valid regex"))
}

pub fn evaluate(signal: &RawSignal, lexicon: &Lexicon) -> MatchCandidate {
    let mut candidate = MatchCandidate::empty(SignalRoute::Finance);
    let text = signal.normalized_text.as_str();

    // A confident OCR trace is authoritative: the sidecar already
    // recognized the receipt layout.
    if let Some(trace) = signal.ocr_trace.as_ref() {
        if trace.merchant.is_some() && trace.total.is_some() && trace.confidence >= OCR_TRUST_FLOOR
        {
            candidate.confidence = trace.confidence.min(0.97);
            candidate.strict_parameters_met = true;
            candidate.reason = vec![
                "finance:ocr_fast_path".into(),
                "merchant_present".into(),
                "amount_present".into(),
            ];
            candidate.extracted.merchant = trace.merchant.clone();
            candidate.extracted.amount = trace.total;
            candidate.extracted.currency =
                Some(trace.currency.clone().unwrap_or_else(|| "EUR".into()));
            candidate.extracted.category = trace.category.clone();
            return candidate;
        }
    }

    let mut score = 0.0;

    let amount = best_amount(text);
    if let Some(hit) = &amount {
        score += 0.38;
        candidate.reason.push("finance:amount".into());
        candidate.extracted.amount = Some(hit.value);
        if let Some(code) = hit.currency {
            score += 0.08;
            candidate.reason.push("finance:currency".into());
            candidate.extracted.currency = Some(code.to_string());
        }
    }

    if let Some((merchant, category, tag, weight)) = find_merchant_signal(text, lexicon) {
        score += weight;
        candidate.reason.push(tag.to_string());
        candidate.extracted.keywords.push(merchant.to_lowercase());
        candidate.extracted.merchant = Some(merchant);
        candidate.extracted.category = category;
    }

    if let Some(word) = lexicon
        .expense_context
        .iter()
        .find(|w| contains_word(text, w))
    {
        score += 0.10;
        candidate.reason.push("finance:expense_context".into());
        candidate.extracted.keywords.push((*word).to_string());
    }

    candidate.confidence = score.min(CAP);
    candidate.strict_parameters_met =
        candidate.extracted.merchant.is_some() && candidate.extracted.amount.is_some();
    push_presence_tags(&mut candidate);
    candidate
}

/// Strongest merchant evidence available, in lexicon-priority order:
/// exact table hit, fuzzy table hit, generic place noun, prepositional
/// capture.
fn find_merchant_signal(
    text: &str,
    lexicon: &Lexicon,
) -> Option<(String, Option<String>, &'static str, f64)> {
    if let Some(entry) = lexicon.find_merchant(text) {
        return Some((
            entry.display.to_string(),
            Some(entry.category.to_string()),
            "finance:merchant_exact",
            0.42,
        ));
    }

    if let Some(entry) = fuzzy_merchant(text, lexicon) {
        return Some((
            entry.0,
            Some(entry.1),
            "finance:merchant_fuzzy",
            0.34,
        ));
    }

    if let Some((noun, category)) = lexicon.find_place_noun(text) {
        return Some((
            noun.to_string(),
            Some(category.to_string()),
            "finance:merchant_generic",
            0.30,
        ));
    }

    if let Some(caps) = prepositional_regex().captures(text) {
        let word = caps[1].to_string();
        // Place nouns already matched above; this is a last-resort
        // proper-noun capture, so keep it only for unknown words.
        return Some((word, None, "finance:merchant_prepositional", 0.26));
    }

    None
}

/// Tolerant merchant lookup for misspellings ("continete").
///
/// A token is accepted when the skim matcher aligns the token inside
/// the lexicon key, the lengths are within two characters, and the
/// first letters agree — tight enough that ordinary words do not
/// collide with the table.
fn fuzzy_merchant(text: &str, lexicon: &Lexicon) -> Option<(String, String)> {
    static MATCHER: OnceLock<SkimMatcherV2> = OnceLock::new();
    let matcher = MATCHER.get_or_init(SkimMatcherV2::default);

    for token in clean_tokens(text) {
        if token.len() < 4 || token.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        for entry in &lexicon.merchants {
            if entry.key.contains(' ') {
                continue;
            }
            let close_len = token.len() + 2 >= entry.key.len() && token.len() <= entry.key.len() + 1;
            let same_head = token.chars().next() == entry.key.chars().next();
            if !close_len || !same_head || token == entry.key {
                continue;
            }
            if matcher.fuzzy_match(entry.key, token).is_some() {
                return Some((entry.display.to_string(), entry.category.to_string()));
            }
        }
    }
    None
}

fn push_presence_tags(candidate: &mut MatchCandidate) {
    candidate.reason.push(
        if candidate.extracted.merchant.is_some() {
            "merchant_present"
        } else {
            "merchant_missing"
        }
        .into(),
    );
    candidate.reason.push(
        if candidate.extracted.amount.is_some() {
            "amount_present"
        } else {
            "amount_missing"
        }
        .into(),
    );
}
