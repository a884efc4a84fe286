//! Links matcher: URL-shaped tokens plus save intent.

use std::sync::OnceLock;

use ambient_types::{RawSignal, SignalRoute};
use regex::Regex;

use crate::lexicon::{contains_word, Lexicon};
use crate::matchers::MatchCandidate;

const CAP: f64 = 0.95;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            (https?://\S+)                                 # with scheme
            | (www\.\S+)                                   # bare www
            | ([a-z0-9][a-z0-9-]*(?:\.[a-z]{2,})+(?:/\S*)?) # bare domain
            ",
        )
        .expect("url regex is valid")
    })
}

pub fn evaluate(signal: &RawSignal, lexicon: &Lexicon) -> MatchCandidate {
    let mut candidate = MatchCandidate::empty(SignalRoute::Links);
    let text = signal.normalized_text.as_str();

    let mut score: f64 = 0.0;

    if let Some((url, with_scheme)) = find_url(text) {
        score += if with_scheme { 0.62 } else { 0.55 };
        candidate.reason.push("links:url".into());
        candidate.extracted.link_url = Some(url);
    }

    if lexicon.save_keywords.iter().any(|w| contains_word(text, w)) {
        score += 0.18;
        candidate.reason.push("links:save_intent".into());
    }

    if lexicon.link_nouns.iter().any(|w| contains_word(text, w)) {
        score += 0.30;
        candidate.reason.push("links:link_noun".into());
    }

    if candidate.extracted.link_url.is_some() {
        if let Some(title) = candidate_title(signal, lexicon) {
            score += 0.08;
            candidate.reason.push("links:title".into());
            candidate.extracted.link_title = Some(title);
        }
    }

    candidate.confidence = score.min(CAP);
    candidate.strict_parameters_met = candidate.extracted.link_url.is_some();
    candidate.reason.push(
        if candidate.strict_parameters_met {
            "link_url_present"
        } else {
            "link_url_missing"
        }
        .into(),
    );
    candidate
}

/// First URL-shaped token, normalized to an https scheme. Returns the
/// URL and whether the original already carried a scheme.
fn find_url(text: &str) -> Option<(String, bool)> {
    let caps = url_regex().captures(text)?;
    if let Some(m) = caps.get(1) {
        return Some((trim_url(m.as_str()).to_string(), true));
    }
    let raw = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map(|m| trim_url(m.as_str()))?;
    // Bare single words like "hoje" never reach here: the bare-domain
    // arm demands at least one dot-separated TLD.
    Some((format!("https://{raw}"), false))
}

fn trim_url(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', '!', '?', ')'])
}

/// Surrounding words as a title candidate: everything that is not the
/// URL itself, filler, save intent, or a connective.
fn candidate_title(signal: &RawSignal, lexicon: &Lexicon) -> Option<String> {
    const CONNECTIVES: &[&str] = &[
        "o", "a", "os", "as", "um", "uma", "este", "esta", "isto", "de", "do", "da", "para", "mim",
        "me", "e", "no", "na",
    ];

    let normalized: Vec<&str> = signal.normalized_text.split_whitespace().collect();
    let raw: Vec<&str> = signal.raw_text.split_whitespace().collect();

    let mut picked: Vec<&str> = Vec::new();
    for (idx, token) in normalized.iter().enumerate() {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty()
            || token.contains('.')
            || token.contains("://")
            || CONNECTIVES.contains(&word)
            || lexicon.filler_words.contains(&word)
            || lexicon.save_keywords.contains(&word)
            || lexicon.link_nouns.contains(&word)
        {
            continue;
        }
        picked.push(raw.get(idx).copied().unwrap_or(token));
    }

    let title = picked.join(" ").trim().to_string();
    (!title.is_empty()).then_some(title)
}
